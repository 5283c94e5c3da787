//! EVM error types

use crate::word::Word;
use thiserror::Error;

/// EVM execution errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max {limit})")]
    StackOverflow {
        /// Configured maximum depth
        limit: usize,
    },

    /// Signed division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Byte that does not decode to a supported opcode
    #[error("unknown opcode 0x{opcode:02x} at offset {offset}")]
    UnknownOpcode {
        /// Offending byte
        opcode: u8,
        /// Position in the code
        offset: usize,
    },

    /// PUSH immediate runs past the end of the code
    #[error("truncated immediate at offset {offset}: expected {expected} bytes, {available} available")]
    TruncatedImmediate {
        /// Position of the PUSH opcode
        offset: usize,
        /// Immediate width of the opcode
        expected: usize,
        /// Bytes left in the code
        available: usize,
    },

    /// Immediate wider than a word
    #[error("immediate of {0} bytes does not fit in a word")]
    ImmediateTooWide(usize),

    /// Memory offset not addressable on this host
    #[error("invalid memory access at offset {offset:#x}")]
    InvalidMemoryAccess {
        /// Requested offset
        offset: Word,
    },

    /// Memory would grow past the configured cap
    #[error("memory limit exceeded: {required} bytes required, limit {limit}")]
    MemoryLimitExceeded {
        /// Word-aligned size the operation needs
        required: usize,
        /// Configured cap in bytes
        limit: usize,
    },

    /// Gas limit reached
    #[error("out of gas: {required} required, limit {limit}")]
    OutOfGas {
        /// Total gas the operation would bring the counter to
        required: u64,
        /// Configured gas limit
        limit: u64,
    },
}

impl EvmError {
    /// Variant name, used by fixtures and machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StackUnderflow => "StackUnderflow",
            Self::StackOverflow { .. } => "StackOverflow",
            Self::DivisionByZero => "DivisionByZero",
            Self::UnknownOpcode { .. } => "UnknownOpcode",
            Self::TruncatedImmediate { .. } => "TruncatedImmediate",
            Self::ImmediateTooWide(_) => "ImmediateTooWide",
            Self::InvalidMemoryAccess { .. } => "InvalidMemoryAccess",
            Self::MemoryLimitExceeded { .. } => "MemoryLimitExceeded",
            Self::OutOfGas { .. } => "OutOfGas",
        }
    }
}

/// Result type for EVM operations
pub type EvmResult<T> = Result<T, EvmError>;

/// Outcome of an interpreter run
///
/// A halted run still carries the state reached before the failing
/// instruction, so callers can report partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether execution reached the end of the code
    pub success: bool,
    /// Gas used
    pub gas_used: u64,
    /// Final stack, bottom to top
    pub stack: Vec<Word>,
    /// Final memory size in bytes
    pub memory_size: usize,
    /// Offset of the failing instruction, or the code length on success
    pub pc: usize,
    /// Error that halted execution
    pub error: Option<EvmError>,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn success(gas_used: u64, stack: Vec<Word>, memory_size: usize, pc: usize) -> Self {
        Self {
            success: true,
            gas_used,
            stack,
            memory_size,
            pc,
            error: None,
        }
    }

    /// Create a halted result
    pub fn halted(
        gas_used: u64,
        stack: Vec<Word>,
        memory_size: usize,
        pc: usize,
        error: EvmError,
    ) -> Self {
        Self {
            success: false,
            gas_used,
            stack,
            memory_size,
            pc,
            error: Some(error),
        }
    }
}
