//! Disassemble command

use clap::Args;
use moi_evm::InstructionStream;
use serde_json::json;

use super::{CodeInput, DEMO_PROGRAM};
use crate::{output::Output, CliError};

/// Print one decoded instruction per line
#[derive(Debug, Args)]
pub struct DisasmCommand {
    #[command(flatten)]
    pub input: CodeInput,
}

impl DisasmCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let code = self.input.load()?.unwrap_or_else(|| DEMO_PROGRAM.to_vec());

        let mut lines = Vec::new();
        let mut entries = Vec::new();
        let mut failure = None;

        for item in InstructionStream::new(&code) {
            match item {
                Ok(instr) => {
                    let immediate = (!instr.immediate.is_empty())
                        .then(|| format!("0x{}", hex::encode(instr.immediate)));
                    lines.push(instr.to_string());
                    entries.push(json!({
                        "offset": instr.offset,
                        "opcode": instr.opcode.name(),
                        "immediate": immediate,
                    }));
                }
                Err(e) => failure = Some(e),
            }
        }

        Output::new(json)
            .field_value("instructions", entries.into())
            .message(&lines.join("\n"))
            .print();

        match failure {
            Some(e) => Err(CliError::InvalidBytecode(e)),
            None => Ok(()),
        }
    }
}
