use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Wiring error: {0}")]
    Wiring(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
