//! CLI error types

use moi_evm::EvmError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Bytecode that cannot be decoded
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(EvmError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Execution stopped on an engine error
    #[error("Execution halted: {0}")]
    Halted(EvmError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Halted(_) => 2,
            _ => 1,
        }
    }
}
