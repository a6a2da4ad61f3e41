//! Pass/fail aggregation for a single run.

use std::fmt;

/// Results from running a specification.
///
/// A fresh report is created for every run. `passed + failed` always equals
/// the number of assertions that were actually evaluated; assertions
/// excluded by a filter are counted in `skipped` and never evaluated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn pass(&mut self) {
        self.passed += 1;
    }

    /// Record a failure. Messages keep their encounter order.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.failed += 1;
        self.failures.push(message.into());
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Render the final summary.
    ///
    /// ```text
    /// FAILED TESTS:
    /// - Calculator - bad math - expected `5` to be `6`
    ///
    /// Passed: 0 Failed: 1 Total: 1
    /// ```
    ///
    /// The `FAILED TESTS:` block is omitted when nothing failed.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.failed > 0 {
            out.push_str("FAILED TESTS:\n");
            for failure in &self.failures {
                out.push_str("- ");
                out.push_str(failure);
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "Passed: {} Failed: {} Total: {}",
            self.passed,
            self.failed,
            self.total()
        ));
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
