//! Run command

use clap::Args;
use moi_evm::{EvmConfig, ExecutionResult, Interpreter};
use serde_json::Value;

use super::{CodeInput, DEMO_PROGRAM};
use crate::{output::Output, CliError};

/// Execute bytecode and print the final state
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub input: CodeInput,
}

impl RunCommand {
    pub fn execute(self, config: &EvmConfig, json: bool) -> Result<(), CliError> {
        let code = match self.input.load()? {
            Some(code) => code,
            None => {
                tracing::info!("no bytecode given, running demo program");
                DEMO_PROGRAM.to_vec()
            }
        };

        tracing::debug!(len = code.len(), ?config, "executing bytecode");
        let mut interp = Interpreter::new(code, config.clone());
        let result = interp.run();

        report(&result, json).print();

        match result.error {
            Some(err) => Err(CliError::Halted(err)),
            None => Ok(()),
        }
    }
}

fn report(result: &ExecutionResult, json: bool) -> Output {
    let stack: Vec<String> = result.stack.iter().map(|w| format!("{:#x}", w)).collect();

    let mut text = String::from("Stack (bottom -> top):\n");
    if stack.is_empty() {
        text.push_str("  (empty)\n");
    }
    for (i, item) in stack.iter().enumerate() {
        text.push_str(&format!("  [{}] {}\n", i, item));
    }
    text.push_str(&format!("Gas used: {}\n", result.gas_used));
    text.push_str(&format!("Memory size: {} bytes", result.memory_size));

    let mut output = Output::new(json)
        .field_bool("success", result.success)
        .field_value("stack", Value::from(stack))
        .field_u64("gas_used", result.gas_used)
        .field_u64("memory_size", result.memory_size as u64)
        .field_u64("pc", result.pc as u64);

    if let Some(err) = &result.error {
        text.push_str(&format!("\nHalted at pc {}: {}", result.pc, err));
        output = output.field("error", &err.to_string()).field("error_kind", err.kind());
    }

    output.message(&text)
}
