//! Object storage configuration

use platform::config::{self, ConfigError};
use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    /// S3-compatible endpoint such as MinIO; `None` targets AWS
    pub endpoint: Option<String>,
}

impl MediaConfig {
    /// Load from `S3_BUCKET`, `S3_REGION`, `S3_ACCESS_KEY_ID`,
    /// `S3_SECRET_ACCESS_KEY` and optional `S3_ENDPOINT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: config::required("S3_BUCKET")?,
            region: config::required("S3_REGION")?,
            access_key_id: config::required("S3_ACCESS_KEY_ID")?,
            secret_access_key: config::required_secret("S3_SECRET_ACCESS_KEY")?,
            endpoint: config::optional("S3_ENDPOINT"),
        })
    }
}
