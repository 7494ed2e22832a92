use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Checks the `api_key` supplied by a caller against the shared secret.
///
/// When no secret is configured every caller is rejected.
pub fn authorize(config: &Config, provided: &str) -> AppResult<()> {
    let matches = config
        .api_key
        .as_deref()
        .map(|expected| bool::from(expected.as_bytes().ct_eq(provided.as_bytes())))
        .unwrap_or(false);

    if !matches {
        let key_prefix: String = provided.chars().take(4).collect();
        warn!(key_prefix = %key_prefix, "Invalid API key attempted");
        return Err(AppError::Unauthorized {
            provided: provided.to_string(),
        });
    }

    debug!("Valid API key authenticated");
    Ok(())
}
