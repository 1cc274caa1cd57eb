//! dz-state: persistence backends for zone and coordinator state.

pub mod memory;
pub mod store;
pub mod types;

pub use memory::MemoryStateStore;
pub use store::JsonStateStore;
pub use types::*;

pub type StateResult<T> = Result<T, StateError>;

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported state version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}

impl From<StateError> for dz_controls::ControlError {
    fn from(err: StateError) -> Self {
        dz_controls::ControlError::Persistence {
            what: err.to_string(),
        }
    }
}
