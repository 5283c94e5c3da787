//! # moi-evm-tests
//!
//! Golden-trace fixtures for the moi-evm engine.
//!
//! This crate provides:
//! - JSON parsing for the fixture format
//! - A runner that executes each fixture and checks stack, gas and memory
//! - Result aggregation across a fixture directory
//!
//! ## Fixture Format
//!
//! ```json
//! {
//!   "add_wraps": {
//!     "code": "0x7fffff...ff600201",
//!     "expect": { "stack": ["0x01"], "gas": 9 }
//!   }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod runner;
mod types;

pub use error::{TestError, TestResult};
pub use runner::{FixtureResults, FixtureRunner, TestStats};
pub use types::*;

/// Directory holding the fixtures shipped with this crate
pub fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}
