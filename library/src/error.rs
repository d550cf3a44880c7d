use thiserror::Error;

use crate::evaluation::driver::DriverError;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("Libloading error: {0}")]
    Libloading(#[from] libloading::Error),
    #[error("Plugin error: {0}")]
    Plugin(String),
    #[error("Missing input: {0}")]
    MissingInput(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl LibraryError {
    pub fn missing_input(pin: impl Into<String>) -> Self {
        LibraryError::MissingInput(pin.into())
    }

    pub fn is_missing_input(&self) -> bool {
        matches!(self, LibraryError::MissingInput(_))
    }
}

impl From<Box<dyn std::error::Error>> for LibraryError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        LibraryError::Runtime(err.to_string())
    }
}
