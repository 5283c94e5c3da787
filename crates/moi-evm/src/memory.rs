//! EVM memory implementation
//!
//! Memory is byte-addressable and grows in 32-byte words. Every growth is
//! billed with the quadratic cost delta between the new size and the cost
//! already charged, so re-touching covered bytes is free.

use crate::error::{EvmError, EvmResult};
use crate::gas;
use crate::word::{self, Word, WORD_BYTES};

/// A planned memory growth and its gas charge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expansion {
    /// Word-aligned size after growth
    pub new_size: usize,
    /// Total memory cost at `new_size`
    pub new_cost: u64,
    /// Delta to charge for this growth
    pub charge: u64,
}

/// EVM memory (byte-addressable, expandable)
#[derive(Clone, Debug, Default)]
pub struct Memory {
    data: Vec<u8>,
    last_charged_cost: u64,
    limit: Option<usize>,
}

impl Memory {
    /// Create new empty memory with no size cap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new empty memory capped at `limit` bytes
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Get current memory size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Cumulative memory cost billed so far
    pub fn last_charged_cost(&self) -> u64 {
        self.last_charged_cost
    }

    /// Get raw data slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Plan the growth needed to cover `offset..offset + width`
    ///
    /// Returns `None` when memory already covers the range. Nothing is
    /// modified.
    pub fn expansion_for(&self, offset: usize, width: usize) -> EvmResult<Option<Expansion>> {
        let end = offset
            .checked_add(width)
            .ok_or(EvmError::InvalidMemoryAccess { offset: Word::from(offset as u64) })?;
        if end <= self.data.len() {
            return Ok(None);
        }

        let words = end.div_ceil(WORD_BYTES);
        let new_size = words
            .checked_mul(WORD_BYTES)
            .ok_or(EvmError::InvalidMemoryAccess { offset: Word::from(offset as u64) })?;
        if let Some(limit) = self.limit {
            if new_size > limit {
                return Err(EvmError::MemoryLimitExceeded { required: new_size, limit });
            }
        }

        let new_cost = gas::memory_cost(words);
        Ok(Some(Expansion {
            new_size,
            new_cost,
            charge: new_cost.saturating_sub(self.last_charged_cost),
        }))
    }

    /// Grow to cover `offset..offset + width`, returning the gas delta
    pub fn expand(&mut self, offset: usize, width: usize) -> EvmResult<u64> {
        match self.expansion_for(offset, width)? {
            Some(expansion) => {
                tracing::debug!(
                    old_size = self.data.len(),
                    new_size = expansion.new_size,
                    charge = expansion.charge,
                    "memory expansion"
                );
                self.data.resize(expansion.new_size, 0);
                self.last_charged_cost = expansion.new_cost;
                Ok(expansion.charge)
            }
            None => Ok(0),
        }
    }

    /// Store a 32-byte big-endian word, returning the expansion charge
    pub fn store_word(&mut self, offset: usize, value: &Word) -> EvmResult<u64> {
        let charge = self.expand(offset, WORD_BYTES)?;
        self.data[offset..offset + WORD_BYTES].copy_from_slice(&word::to_be_bytes(value));
        Ok(charge)
    }

    /// Store a single byte, returning the expansion charge
    pub fn store_byte(&mut self, offset: usize, value: u8) -> EvmResult<u64> {
        let charge = self.expand(offset, 1)?;
        self.data[offset] = value;
        Ok(charge)
    }

    /// Load a 32-byte word, zero-filled past the end
    pub fn load_word(&self, offset: usize) -> Word {
        let mut bytes = [0u8; WORD_BYTES];
        if offset < self.data.len() {
            let end = offset.saturating_add(WORD_BYTES).min(self.data.len());
            bytes[..end - offset].copy_from_slice(&self.data[offset..end]);
        }
        Word::from_big_endian(&bytes)
    }
}
