use crate::error::{AppError, AppResult};

const PDF_SUFFIX: &str = ".pdf";
const MIN_FILENAME_LEN: usize = 5;

/// Checks that the last path segment of `url` looks like a PDF filename and
/// returns that segment.
///
/// Only the suffix and length are checked; the bytes behind the URL are never
/// inspected.
pub fn validate_filename(url: &str) -> AppResult<&str> {
    let filename = url.rsplit('/').next().unwrap_or(url);

    if !filename.ends_with(PDF_SUFFIX) || filename.len() < MIN_FILENAME_LEN {
        return Err(AppError::invalid_filename(filename));
    }

    Ok(filename)
}
