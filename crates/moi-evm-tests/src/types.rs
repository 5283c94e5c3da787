//! Type definitions for the fixture JSON format

use moi_evm::{EvmConfig, Word};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Hex-encoded bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexBytes(Vec::new()));
        }
        hex::decode(s)
            .map(HexBytes)
            .map_err(serde::de::Error::custom)
    }
}

/// Hex-encoded word (up to 32 bytes, odd length allowed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexWord(pub Word);

impl<'de> Deserialize<'de> for HexWord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexWord(Word::zero()));
        }
        if s.len() > 64 {
            return Err(serde::de::Error::custom(format!(
                "word wider than 32 bytes: {} hex digits",
                s.len()
            )));
        }

        // Pad with leading zero if odd length
        let padded = if s.len() % 2 == 1 {
            format!("0{}", s)
        } else {
            s.to_string()
        };

        let bytes = hex::decode(&padded).map_err(serde::de::Error::custom)?;
        Ok(HexWord(Word::from_big_endian(&bytes)))
    }
}

/// Fixture file structure (map of test name -> fixture)
pub type FixtureFile = BTreeMap<String, Fixture>;

/// Single fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    /// Bytecode to run
    pub code: HexBytes,
    /// Engine limits (defaults when absent)
    #[serde(default)]
    pub config: EvmConfig,
    /// Expected outcome
    pub expect: Expectation,
}

/// Expected outcome of a fixture; absent fields are not checked
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    /// Final stack, bottom to top
    pub stack: Option<Vec<HexWord>>,
    /// Total gas used
    pub gas: Option<u64>,
    /// Final memory size in bytes
    pub memory_size: Option<usize>,
    /// Exact memory contents
    pub memory: Option<HexBytes>,
    /// Error kind the run must halt with (e.g. `"StackUnderflow"`)
    pub error: Option<String>,
}
