use std::path::{Path, PathBuf};

use crate::config::Config;

/// Derives every address of a stored document from its record id.
///
/// The object key is namespaced by the shared API key, so one leaked
/// persistent link does not reveal where sibling documents live.
#[derive(Debug, Clone)]
pub struct LinkDeriver {
    base_url: String,
    region: String,
    bucket: String,
    api_key: String,
}

impl LinkDeriver {
    pub fn new(
        base_url: impl Into<String>,
        region: impl Into<String>,
        bucket: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            region: region.into(),
            bucket: bucket.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.base_url.clone(),
            config.aws_region.clone(),
            config.aws_bucket.clone(),
            config.api_key.clone().unwrap_or_default(),
        )
    }

    pub fn object_key(&self, id: i32) -> String {
        format!("files/{}/{}.pdf", self.api_key, id)
    }

    pub fn temporary_link(&self, id: i32) -> String {
        format!("{}/download/{}.pdf", self.base_url, id)
    }

    pub fn persistent_link(&self, id: i32) -> String {
        format!(
            "https://s3-{}.amazonaws.com/{}/{}",
            self.region,
            self.bucket,
            self.object_key(id)
        )
    }
}

/// Local staging location for a record's bytes.
pub fn staged_path(staging_dir: &Path, id: i32) -> PathBuf {
    staging_dir.join(format!("{}.pdf", id))
}
