use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub storage: StorageConfig,
    /// Responds to any origin. Intended for local development only.
    pub cors_allow_all: bool,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket all presigned URLs are scoped to
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, Backblaze B2)
    pub endpoint: Option<String>,
    /// Static credentials; falls back to the SDK provider chain when unset
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Path-style addressing, required by most non-AWS endpoints
    pub force_path_style: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cors_allow_all = std::env::var("CORS_ALLOW_ALL")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let bucket = std::env::var("S3_BUCKET").unwrap_or_default();
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let endpoint = std::env::var("S3_ENDPOINT").ok();
        let access_key_id = std::env::var("S3_ACCESS_KEY_ID").ok();
        let secret_access_key = std::env::var("S3_SECRET_ACCESS_KEY").ok();

        let force_path_style = std::env::var("S3_FORCE_PATH_STYLE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            bind_address,
            storage: StorageConfig {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
                force_path_style,
            },
            cors_allow_all,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "S3_BUCKET cannot be empty".to_string(),
            ));
        }

        if self.storage.access_key_id.is_some() != self.storage.secret_access_key.is_some() {
            return Err(ConfigError::ValidationError(
                "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set together".to_string(),
            ));
        }

        Ok(())
    }
}
