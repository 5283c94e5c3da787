//! Fixture runner and statistics

use crate::error::{TestError, TestResult};
use crate::types::*;
use moi_evm::{ExecutionResult, Interpreter, Word};
use std::path::Path;
use std::time::{Duration, Instant};

/// Fixture runner
pub struct FixtureRunner {
    /// Verbose output
    verbose: bool,
}

impl FixtureRunner {
    /// Create new fixture runner
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Run all fixtures in a file
    pub fn run_file(&self, path: &Path) -> TestResult<FixtureResults> {
        let content = std::fs::read_to_string(path)?;
        let fixtures: FixtureFile = serde_json::from_str(&content)?;

        let mut results = FixtureResults::new(path.to_string_lossy().to_string());

        for (name, fixture) in fixtures {
            match self.run_case(&fixture) {
                Ok(()) => {
                    if self.verbose {
                        tracing::info!("PASS: {}", name);
                    }
                    results.passed.push(name);
                }
                Err(e) => {
                    if self.verbose {
                        tracing::warn!("FAIL: {} - {}", name, e);
                    }
                    results.failed.push((name, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Run a single fixture
    pub fn run_case(&self, fixture: &Fixture) -> TestResult<()> {
        let mut interp = Interpreter::new(fixture.code.0.clone(), fixture.config.clone());
        let result = interp.run();
        check_result(&fixture.expect, &result, interp.engine().memory().data())
    }

    /// Run every `.json` fixture under `dir`, recursing into subdirectories
    pub fn run_dir(&self, dir: &Path) -> TestResult<TestStats> {
        let mut stats = TestStats::new();
        let start = Instant::now();

        if self.verbose {
            println!("Running fixtures from: {:?}", dir);
        }

        self.run_dir_recursive(dir, &mut stats)?;

        stats.duration = start.elapsed();
        Ok(stats)
    }

    fn run_dir_recursive(&self, dir: &Path, stats: &mut TestStats) -> TestResult<()> {
        if !dir.exists() {
            if self.verbose {
                println!("Directory not found: {:?}", dir);
            }
            return Ok(());
        }

        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.run_dir_recursive(&path, stats)?;
            } else if path.extension().is_some_and(|e| e == "json") {
                let results = self.run_file(&path)?;
                if self.verbose && !results.failed.is_empty() {
                    println!(
                        "File: {:?} - {} passed, {} failed",
                        path,
                        results.passed.len(),
                        results.failed.len()
                    );
                }
                stats.add_results(&results);
            }
        }

        Ok(())
    }
}

/// Compare an execution result against the expectation
fn check_result(expect: &Expectation, result: &ExecutionResult, memory: &[u8]) -> TestResult<()> {
    match (&expect.error, &result.error) {
        (Some(kind), Some(err)) if err.kind() != kind => {
            return Err(TestError::Assertion(format!(
                "error mismatch: expected {}, got {} ({})",
                kind,
                err.kind(),
                err
            )));
        }
        (Some(kind), None) => {
            return Err(TestError::Assertion(format!(
                "expected {} but execution succeeded",
                kind
            )));
        }
        (None, Some(err)) => {
            return Err(TestError::Assertion(format!(
                "unexpected halt at pc {}: {}",
                result.pc, err
            )));
        }
        _ => {}
    }

    if let Some(stack) = &expect.stack {
        let expected: Vec<Word> = stack.iter().map(|w| w.0).collect();
        if expected != result.stack {
            return Err(TestError::Assertion(format!(
                "stack mismatch: expected {}, got {}",
                format_stack(&expected),
                format_stack(&result.stack)
            )));
        }
    }

    if let Some(gas) = expect.gas {
        if gas != result.gas_used {
            return Err(TestError::Assertion(format!(
                "gas mismatch: expected {}, got {}",
                gas, result.gas_used
            )));
        }
    }

    if let Some(size) = expect.memory_size {
        if size != result.memory_size {
            return Err(TestError::Assertion(format!(
                "memory size mismatch: expected {}, got {}",
                size, result.memory_size
            )));
        }
    }

    if let Some(bytes) = &expect.memory {
        if bytes.0 != memory {
            return Err(TestError::Assertion(format!(
                "memory mismatch: expected 0x{}, got 0x{}",
                hex::encode(&bytes.0),
                hex::encode(memory)
            )));
        }
    }

    Ok(())
}

fn format_stack(stack: &[Word]) -> String {
    let items: Vec<String> = stack.iter().map(|w| format!("{:#x}", w)).collect();
    format!("[{}]", items.join(", "))
}

/// Results from one fixture file
#[derive(Debug)]
pub struct FixtureResults {
    /// File path
    pub file: String,
    /// Passed fixtures
    pub passed: Vec<String>,
    /// Failed fixtures with reasons
    pub failed: Vec<(String, String)>,
}

impl FixtureResults {
    /// Create new results
    pub fn new(file: String) -> Self {
        Self {
            file,
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Total fixtures run
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Aggregated test statistics
#[derive(Debug, Default)]
pub struct TestStats {
    /// Total fixtures executed
    pub total: usize,
    /// Fixtures passed
    pub passed: usize,
    /// Fixtures failed
    pub failed: usize,
    /// Total execution time
    pub duration: Duration,
    /// Failed fixture names with reasons
    pub failures: Vec<(String, String)>,
}

impl TestStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the results of one file
    pub fn add_results(&mut self, results: &FixtureResults) {
        self.total += results.total();
        self.passed += results.passed.len();
        self.failed += results.failed.len();
        for (name, reason) in &results.failed {
            self.failures.push((format!("{}::{}", results.file, name), reason.clone()));
        }
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }

    /// Print summary
    pub fn print_summary(&self) {
        println!("\n========================================");
        println!("Fixture Summary");
        println!("========================================");
        println!("Total:   {}", self.total);
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Pass Rate: {:.2}%", self.pass_rate());
        println!("Duration: {:.2}s", self.duration.as_secs_f64());

        if !self.failures.is_empty() {
            println!("\nFailed fixtures:");
            for (name, reason) in &self.failures {
                println!("  - {}: {}", name, reason);
            }
        }
    }
}
