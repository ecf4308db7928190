use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed for {locator}: {reason}")]
    Fetch { locator: String, reason: String },

    #[error("Extraction failed for {source_name}: {reason}")]
    Extract { source_name: String, reason: String },

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Identity store error at {path}: {reason}")]
    Store { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
