//! EVM stack implementation

use crate::error::{EvmError, EvmResult};
use crate::word::Word;

/// Operand stack of 256-bit words
#[derive(Clone, Debug, Default)]
pub struct Stack {
    data: Vec<Word>,
    limit: Option<usize>,
}

impl Stack {
    /// Create a new empty, unbounded stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack that rejects pushes beyond `limit` items
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Word) -> EvmResult<()> {
        if let Some(limit) = self.limit {
            if self.data.len() >= limit {
                return Err(EvmError::StackOverflow { limit });
            }
        }
        self.data.push(value);
        Ok(())
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> EvmResult<Word> {
        self.data.pop().ok_or(EvmError::StackUnderflow)
    }

    /// Peek at a specific depth (0 = top)
    pub fn peek(&self, depth: usize) -> EvmResult<&Word> {
        if depth >= self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        Ok(&self.data[self.data.len() - 1 - depth])
    }

    /// Fail with `StackUnderflow` unless at least `n` items are present
    pub fn require(&self, n: usize) -> EvmResult<()> {
        if self.data.len() < n {
            return Err(EvmError::StackUnderflow);
        }
        Ok(())
    }

    /// Current contents, bottom to top
    pub fn snapshot(&self) -> &[Word] {
        &self.data
    }

    /// Get current stack size
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
