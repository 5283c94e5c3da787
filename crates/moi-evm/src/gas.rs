//! Gas cost calculations and metering

use crate::error::{EvmError, EvmResult};
use crate::opcode::Opcode;

/// Gas costs for EVM operations
pub mod cost {
    /// Zero gas
    pub const ZERO: u64 = 0;
    /// Very low gas
    pub const VERYLOW: u64 = 3;
    /// Low gas
    pub const LOW: u64 = 5;
    /// Exp gas per byte of the result
    pub const EXP_BYTE: u64 = 50;
    /// Memory gas per word
    pub const MEMORY: u64 = 3;
    /// Quadratic memory divisor
    pub const QUAD_COEFF_DIV: u64 = 512;
}

/// Get static gas cost for an opcode
///
/// EXP is charged entirely through [`exp_gas`].
pub fn static_gas(opcode: Opcode) -> u64 {
    match opcode {
        Opcode::ADD | Opcode::MSTORE | Opcode::MSTORE8 => cost::VERYLOW,
        Opcode::MUL | Opcode::SDIV => cost::LOW,
        Opcode::EXP => cost::ZERO,
        op if op.is_push() => cost::VERYLOW,
        _ => cost::ZERO,
    }
}

/// Total memory cost for a memory of `words` 32-byte words
pub fn memory_cost(words: usize) -> u64 {
    let words = words as u64;
    cost::MEMORY
        .saturating_mul(words)
        .saturating_add(words.saturating_mul(words) / cost::QUAD_COEFF_DIV)
}

/// EXP gas for a result of `byte_len` significant bytes
pub fn exp_gas(byte_len: usize) -> u64 {
    cost::EXP_BYTE * byte_len as u64
}

/// Monotonic gas counter with an optional ceiling
#[derive(Clone, Debug, Default)]
pub struct GasMeter {
    used: u64,
    limit: Option<u64>,
}

impl GasMeter {
    /// Create a meter starting at zero
    pub fn new(limit: Option<u64>) -> Self {
        Self { used: 0, limit }
    }

    /// Gas consumed so far
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Configured limit, if any
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Check that `amount` more gas fits under the limit
    pub fn ensure(&self, amount: u64) -> EvmResult<()> {
        if let Some(limit) = self.limit {
            let required = self.used.saturating_add(amount);
            if required > limit {
                return Err(EvmError::OutOfGas { required, limit });
            }
        }
        Ok(())
    }

    /// Add `amount` to the counter
    pub fn charge(&mut self, amount: u64) -> EvmResult<()> {
        self.ensure(amount)?;
        self.used = self.used.saturating_add(amount);
        Ok(())
    }
}
