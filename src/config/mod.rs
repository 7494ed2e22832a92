use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub base_url: String,
    pub api_key: Option<String>,
    pub aws_region: String,
    pub aws_bucket: String,
    pub staging_dir: PathBuf,
    pub fail_on_upload_error: bool,
    pub log_format: LogFormat,
}

// The shared secret must never end up in logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("db_max_connections", &self.db_max_connections)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("aws_region", &self.aws_region)
            .field("aws_bucket", &self.aws_bucket)
            .field("staging_dir", &self.staging_dir)
            .field("fail_on_upload_error", &self.fail_on_upload_error)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `PORT` is mandatory; every other setting falls back to a default when
    /// unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .filter(|p| !p.trim().is_empty())
            .context("$PORT must be set")?;
        let server_port = port
            .trim()
            .parse::<u16>()
            .with_context(|| format!("Failed to parse PORT: {}", port))?;

        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            database_url: lookup("DATABASE_URL").unwrap_or_default(),
            db_max_connections: Self::parse_var(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            base_url: lookup("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            api_key: lookup("API_KEY").filter(|k| !k.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_default(),
            aws_bucket: lookup("AWS_BUCKET").unwrap_or_default(),
            staging_dir: lookup("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tmp")),
            fail_on_upload_error: Self::parse_var(&lookup, "FAIL_ON_UPLOAD_ERROR", false)?,
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reports the effective settings. Called once logging is initialised.
    pub fn log_summary(&self) {
        if self.api_key.is_none() {
            warn!("API_KEY is not set, every request will be rejected as unauthorized");
        }
        info!("Configuration loaded successfully: {:?}", self);
    }

    // Runs before logging is set up, so bad values are fatal rather than warned about
    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => val
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Failed to parse {}={:?}: {}", var_name, val, e)),
            None => Ok(default),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }
        Ok(())
    }
}
