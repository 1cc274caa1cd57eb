//! Error types for the dz-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Runtime compilation failed: {0}")]
    Compile(String),

    #[error("Control error: {0}")]
    Control(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Scenario error: {message}")]
    Scenario { message: String },

    #[error("Failed to render output: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dz-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<dz_project::ProjectError> for AppError {
    fn from(err: dz_project::ProjectError) -> Self {
        match err {
            dz_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Config(other.to_string()),
        }
    }
}

impl From<dz_project::ValidationError> for AppError {
    fn from(err: dz_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<dz_controls::ControlError> for AppError {
    fn from(err: dz_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<dz_state::StateError> for AppError {
    fn from(err: dz_state::StateError) -> Self {
        AppError::State(err.to_string())
    }
}
