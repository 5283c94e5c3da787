//! Engine limits

/// Memory cap applied by [`EvmConfig::mainnet`] (4 MiB)
pub const MAINNET_MEMORY_LIMIT: usize = 4 * 1024 * 1024;

/// Stack depth used by Ethereum mainnet
pub const MAINNET_STACK_LIMIT: usize = 1024;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvmConfig {
    /// Maximum stack depth (`None` = unbounded)
    pub stack_limit: Option<usize>,
    /// Maximum memory size in bytes (`None` = unbounded)
    pub memory_limit: Option<usize>,
    /// Maximum total gas (`None` = count only)
    pub gas_limit: Option<u64>,
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl EvmConfig {
    /// Configuration with mainnet stack depth and a memory cap
    pub fn mainnet() -> Self {
        Self {
            stack_limit: Some(MAINNET_STACK_LIMIT),
            memory_limit: Some(MAINNET_MEMORY_LIMIT),
            gas_limit: None,
        }
    }

    /// Configuration without any limits
    pub fn unbounded() -> Self {
        Self {
            stack_limit: None,
            memory_limit: None,
            gas_limit: None,
        }
    }

    /// Set the gas limit
    pub fn with_gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    /// Set the stack limit
    pub fn with_stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = Some(limit);
        self
    }

    /// Set the memory limit
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = Some(limit);
        self
    }
}
