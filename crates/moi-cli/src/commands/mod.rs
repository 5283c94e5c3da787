//! CLI command implementations

pub mod disasm;
pub mod run;

use clap::Args;
use std::path::PathBuf;

use crate::CliError;

/// Demo program: store, then ADD/MUL/SDIV/EXP down to `[7, 64]`
pub const DEMO_PROGRAM: &[u8] = &[
    0x60, 0x07, // PUSH1 7
    0x60, 0x01, // PUSH1 1
    0x60, 0x20, // PUSH1 0x20
    0x52, // MSTORE
    0x60, 0x02, // PUSH1 2
    0x60, 0x03, // PUSH1 3
    0x01, // ADD
    0x60, 0x04, // PUSH1 4
    0x02, // MUL
    0x60, 0x05, // PUSH1 5
    0x05, // SDIV
    0x60, 0x03, // PUSH1 3
    0x0a, // EXP
];

/// Bytecode source shared by `run` and `disasm`
#[derive(Debug, Args)]
pub struct CodeInput {
    /// Bytecode as hex (`0x` prefix optional, whitespace ignored)
    #[arg(conflicts_with = "file")]
    pub code: Option<String>,

    /// Read hex bytecode from a file
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

impl CodeInput {
    /// Resolve to bytes; `None` when neither a literal nor a file was given
    pub fn load(&self) -> Result<Option<Vec<u8>>, CliError> {
        if let Some(code) = &self.code {
            return parse_bytecode(code).map(Some);
        }
        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)?;
            return parse_bytecode(&content).map(Some);
        }
        Ok(None)
    }
}

/// Parse hex bytecode
pub fn parse_bytecode(input: &str) -> Result<Vec<u8>, CliError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let hex_str = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(hex_str).map_err(|e| CliError::InvalidHex(e.to_string()))
}
