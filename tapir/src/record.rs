//! Per-test data delivered by the host framework

use chrono::{DateTime, Duration, Utc};

/// The outcome of one assertion (or other checked part) within a test. A
/// test may record any number of parts; each failed part gets its own
/// entry in the rendered diagnostic block.
#[derive(Debug, Clone)]
pub struct PartRecord {
    /// Whether the part failed
    pub failed: bool,
    /// Whether the failure was fatal (it aborted the test body)
    pub fatal: bool,
    /// Source file of the assertion, when the framework knows it
    pub file: Option<String>,
    /// Source line of the assertion, when the framework knows it
    pub line: Option<u32>,
    /// Human readable summary of what happened
    pub summary: String,
}

impl PartRecord {
    /// A passing part.
    pub fn passed<S: Into<String>>(summary: S) -> Self {
        Self {
            failed: false,
            fatal: false,
            file: None,
            line: None,
            summary: summary.into(),
        }
    }

    /// A non-fatal failure located at `file:line`.
    pub fn failed_at<F, S>(file: Option<F>, line: Option<u32>, summary: S) -> Self
    where
        F: Into<String>,
        S: Into<String>,
    {
        Self {
            failed: true,
            fatal: false,
            file: file.map(Into::into),
            line,
            summary: summary.into(),
        }
    }

    /// A fatal failure located at `file:line`.
    pub fn fatal_at<F, S>(file: Option<F>, line: Option<u32>, summary: S) -> Self
    where
        F: Into<String>,
        S: Into<String>,
    {
        Self {
            fatal: true,
            ..Self::failed_at(file, line, summary)
        }
    }
}

/// Everything the host framework reports about one finished test.
///
/// Built by the host as the test runs, handed to reporters once, never
/// mutated afterwards.
#[derive(Debug)]
pub struct TestRecord {
    /// Name of the suite (test case, group) the test belongs to
    pub suite: String,
    /// Name of the test itself
    pub name: String,
    /// False when the framework filtered the test out
    pub should_run: bool,
    /// When the test started
    pub started: DateTime<Utc>,
    /// When the test finished
    pub ended: DateTime<Utc>,
    /// Outcomes for each recorded part, in execution order
    pub parts: Vec<PartRecord>,
}

impl TestRecord {
    /// Create a record for a test that is about to run.
    pub fn new<S: Into<String>, N: Into<String>>(suite: S, name: N) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            should_run: true,
            started: Utc::now(),
            ended: Utc::now(), // will be updated
            parts: vec![],
        }
    }

    /// Mark whether the framework actually ran this test.
    pub fn set_should_run(&mut self, should_run: bool) -> &mut Self {
        self.should_run = should_run;
        self
    }

    /// Record one part outcome. Also bumps the finish stamp.
    pub fn add_part(&mut self, part: PartRecord) -> &mut Self {
        self.parts.push(part);
        self.ended = Utc::now();
        self
    }

    /// Mark the test as finished now.
    pub fn finish(&mut self) -> &mut Self {
        self.ended = Utc::now();
        self
    }

    /// The test did not run (it was filtered out).
    pub fn skipped(&self) -> bool {
        !self.should_run
    }

    /// At least one part failed.
    pub fn failed(&self) -> bool {
        self.parts.iter().any(|p| p.failed)
    }

    /// At least one part failed fatally.
    pub fn has_fatal_failure(&self) -> bool {
        self.parts.iter().any(|p| p.fatal)
    }

    /// Wall-clock time the test took.
    pub fn elapsed(&self) -> Duration {
        self.ended - self.started
    }

    /// Iterate over the failed parts, in execution order.
    pub fn failed_parts(&self) -> impl Iterator<Item = &PartRecord> {
        self.parts.iter().filter(|p| p.failed)
    }
}
