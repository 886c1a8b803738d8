/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument for {command}: {reason}")]
    InvalidArgument { command: String, reason: String },
}
