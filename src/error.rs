use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Invalid listing data: {reason}")]
    InvalidData { reason: String },

    #[error("Unknown view mode '{0}', expected 'properties' or 'complexes'")]
    UnknownViewMode(String),

    #[error("Map provider is not available")]
    MapUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, PortalError>;
