//! # moi-cli
//!
//! Command-line harness for the moi-evm engine.
//!
//! ## Usage
//!
//! ```bash
//! # Run the built-in demo program
//! moi run
//!
//! # Run bytecode
//! moi run 0x6002600301
//! moi run --file program.hex --gas-limit 1000
//!
//! # Disassemble
//! moi disasm 0x6002600301
//!
//! # Configuration (~/.moi/config.toml)
//! moi config --show
//! moi config --set-log-level debug
//! ```

use clap::{Parser, Subcommand};
use moi_evm::EvmConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// moi EVM harness
#[derive(Parser, Debug)]
#[command(name = "moi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Gas limit for execution
    #[arg(long, global = true)]
    gas_limit: Option<u64>,

    /// Maximum stack depth
    #[arg(long, global = true)]
    stack_limit: Option<usize>,

    /// Maximum memory size in bytes
    #[arg(long, global = true)]
    memory_limit: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Execute bytecode (the demo program when none is given)
    Run(commands::run::RunCommand),
    /// Disassemble bytecode
    Disasm(commands::disasm::DisasmCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set default log level
        #[arg(long)]
        set_log_level: Option<String>,
        /// Set default gas limit
        #[arg(long)]
        set_gas_limit: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        match &e {
            // The run report already carries the error
            CliError::Halted(_) => {
                if !json {
                    eprintln!("Error: {}", e);
                }
            }
            _ if json => println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            ),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load()?;
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level));

    let evm_config = cli.evm_config(&config.evm);
    match cli.command {
        Commands::Run(cmd) => cmd.execute(&evm_config, cli.json),
        Commands::Disasm(cmd) => cmd.execute(cli.json),
        Commands::Config {
            show,
            set_log_level,
            set_gas_limit,
        } => handle_config(&mut config, show, set_log_level, set_gas_limit, cli.json),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

impl Cli {
    /// File limits with command-line flags applied on top
    fn evm_config(&self, base: &EvmConfig) -> EvmConfig {
        let mut config = base.clone();
        if let Some(limit) = self.gas_limit {
            config.gas_limit = Some(limit);
        }
        if let Some(limit) = self.stack_limit {
            config.stack_limit = Some(limit);
        }
        if let Some(limit) = self.memory_limit {
            config.memory_limit = Some(limit);
        }
        config
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_log_level: Option<String>,
    set_gas_limit: Option<u64>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(level) = set_log_level {
        EnvFilter::try_new(&level).map_err(|e| CliError::InvalidInput(e.to_string()))?;
        config.log_level = level;
        modified = true;
    }

    if let Some(limit) = set_gas_limit {
        config.evm.gas_limit = Some(limit);
        modified = true;
    }

    if modified {
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message(&format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let limit = |v: Option<usize>| v.map_or("none".to_string(), |n| n.to_string());
        Output::new(json)
            .field("log_level", &config.log_level)
            .field_value("evm", serde_json::to_value(&config.evm)?)
            .message(&format!(
                "Log level: {}\nGas limit: {}\nStack limit: {}\nMemory limit: {}",
                config.log_level,
                config.evm.gas_limit.map_or("none".to_string(), |n| n.to_string()),
                limit(config.evm.stack_limit),
                limit(config.evm.memory_limit),
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-log-level/--set-gas-limit to modify")
            .print();
    }

    Ok(())
}
