use thiserror::Error;

use super::config::ConfigError;
use crate::printing::PrintingError;

/// Anything that stops the process from serving
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Printer startup failed: {0}")]
    Printer(#[from] PrintingError),

    #[error("Logger setup failed: {0}")]
    Logger(#[from] anyhow::Error),

    #[error("HTTP server error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StartupError>;
