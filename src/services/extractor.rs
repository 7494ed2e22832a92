use once_cell::sync::Lazy;
use regex::Regex;

static PDF_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://\S+\.pdf").unwrap_or_else(|e| panic!("invalid PDF URL pattern: {}", e))
});

/// Returns the leftmost `https://...pdf` URL found in free text.
pub fn extract_url(message: &str) -> Option<&str> {
    PDF_URL.find(message).map(|m| m.as_str())
}
