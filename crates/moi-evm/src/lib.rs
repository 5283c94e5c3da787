//! # moi-evm
//!
//! Minimal EVM-style execution engine.
//!
//! This crate provides:
//! - 256-bit word arithmetic (wrapping add/mul, signed division, exponentiation)
//! - Operand stack and word-aligned memory with quadratic expansion cost
//! - Gas metering
//! - An instruction stream and interpreter that drive the engine from bytecode
//!
//! ## Example
//!
//! ```
//! use moi_evm::{EvmConfig, Interpreter, Word};
//!
//! // PUSH1 2, PUSH1 3, ADD
//! let mut interp = Interpreter::new(vec![0x60, 0x02, 0x60, 0x03, 0x01], EvmConfig::default());
//! let result = interp.run();
//! assert!(result.success);
//! assert_eq!(result.stack, vec![Word::from(5u64)]);
//! assert_eq!(result.gas_used, 9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod evm;
pub mod gas;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod stack;
pub mod word;

pub use config::EvmConfig;
pub use error::{EvmError, EvmResult, ExecutionResult};
pub use evm::Evm;
pub use gas::GasMeter;
pub use interpreter::{disassemble, Instruction, InstructionStream, Interpreter};
pub use memory::Memory;
pub use opcode::Opcode;
pub use stack::Stack;
pub use word::Word;
