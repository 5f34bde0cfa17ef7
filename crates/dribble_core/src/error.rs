use thiserror::Error;

/// Configuration loading / validation failure
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unknown config format: {path}")]
    UnknownFormat { path: String },
}

/// Scenario fixture loading failure
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid scenario: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Whether retrying with a corrected file could succeed
    pub fn is_user_fixable(&self) -> bool {
        match self {
            ConfigError::Io(_) => false,
            ConfigError::Json(_) | ConfigError::Yaml(_) => true,
            ConfigError::Validation(_) => true,
            ConfigError::UnknownFormat { .. } => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
