//! The aggregation state machine that turns test events into TAP text

use crate::escape::{escape_message, left_strip};
use crate::event::Event;
use crate::line::{diagnostic_block, Status, TapLine};
use crate::record::TestRecord;
use crate::set::TestSet;
use thiserror::Error;

/// Aggregation policy for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One global test counter and a single final plan line
    Flat,
    /// Tests grouped by suite, each suite rendered as a TAP subtest with
    /// its own plan and summary
    Nested,
}

/// Where a session is in the program lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

/// Events arrived out of their required order.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A test finished, or the program ended, before the program started
    #[error("Test program has not started")]
    NotStarted,
    /// The program started twice
    #[error("Test program has already started")]
    AlreadyStarted,
    /// An event arrived after the program ended
    #[error("Test program has already finished")]
    AlreadyFinished,
}

/// A summary of how many tests passed/failed/skipped.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// number of passing tests
    pub passed: usize,
    /// number of failed tests (skipped tests never count as failed)
    pub failed: usize,
    /// number of skipped tests
    pub skipped: usize,
    /// total number of tests
    pub total: usize,
}

impl RunStats {
    /// Fold one finished test into the counts.
    pub fn add(&mut self, record: &TestRecord) {
        self.total += 1;
        if record.skipped() {
            self.skipped += 1;
        } else if record.failed() || record.has_fatal_failure() {
            self.failed += 1;
        } else {
            self.passed += 1;
        }
    }
}

/// The stateful core: consumes ordered [`Event`]s and returns the TAP text
/// each one produces.
///
/// Text for one event comes back as a single chunk so the caller can write
/// it atomically; nothing is held back for later events, which keeps the
/// transcript tailable while the program is still running.
///
/// Expected event order: `Started` once, any number of test completions,
/// `Ended` once. Anything else is a [`SessionError`].
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    phase: Phase,
    stats: RunStats,
    // nested mode suite tracking
    current_suite: String,
    tests_in_suite: usize,
    failures_in_suite: usize,
    suites_emitted: usize,
    // flat mode numbering
    set: TestSet,
}

impl Session {
    /// Create an idle session with the given aggregation policy.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            phase: Phase::Idle,
            stats: RunStats::default(),
            current_suite: String::new(),
            tests_in_suite: 0,
            failures_in_suite: 0,
            suites_emitted: 0,
            set: TestSet::new(),
        }
    }

    /// The aggregation policy this session was created with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Counts of the finished tests seen so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// The final plan line has been written.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Feed one event, returning the text it produces.
    pub fn handle(&mut self, event: &Event) -> Result<String, SessionError> {
        match event {
            Event::Started => self.begin(),
            Event::TestFinished(record) => self.record(record.as_ref()),
            Event::Ended => self.end(),
        }
    }

    /// Start the test program: reset all state and return the TAP header.
    pub fn begin(&mut self) -> Result<String, SessionError> {
        match self.phase {
            Phase::Running => return Err(SessionError::AlreadyStarted),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Idle => (),
        }

        self.phase = Phase::Running;
        self.stats = RunStats::default();
        self.current_suite.clear();
        self.tests_in_suite = 0;
        self.failures_in_suite = 0;
        self.suites_emitted = 0;
        self.set = TestSet::new();

        Ok(match self.mode {
            Mode::Flat => String::from("TAP version 13\n"),
            Mode::Nested => String::from("TAP version 13\n# nesting\n"),
        })
    }

    /// Record one finished test and return its result line (plus, in
    /// nested mode, any suite transition output around it).
    pub fn record(&mut self, record: &TestRecord) -> Result<String, SessionError> {
        match self.phase {
            Phase::Idle => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Running => (),
        }

        self.stats.add(record);
        Ok(match self.mode {
            Mode::Flat => self.record_flat(record),
            Mode::Nested => self.record_nested(record),
        })
    }

    /// End the test program: flush any pending suite and return the final
    /// plan line.
    pub fn end(&mut self) -> Result<String, SessionError> {
        match self.phase {
            Phase::Idle => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Running => (),
        }

        self.phase = Phase::Finished;
        Ok(match self.mode {
            Mode::Flat => format!("1..{}\n", self.set.len()),
            Mode::Nested => {
                let mut out = self.flush_suite();
                out.push_str(&format!("1..{}\n", self.suites_emitted));
                out
            }
        })
    }

    fn record_flat(&mut self, record: &TestRecord) -> String {
        let status = if record.has_fatal_failure() && !record.skipped() {
            Status::BailOut
        } else if record.failed() {
            Status::NotOk
        } else {
            Status::Ok
        };

        let mut line = TapLine::new(status, &record.name);
        line.set_skip(record.skipped());

        if status == Status::NotOk {
            // flat mode has no diagnostic block; surface the first failure
            // as a single-line comment
            if let Some(part) = record.failed_parts().next() {
                line.set_comment(escape_message(left_strip(&part.summary)));
            }
        } else if status == Status::Ok && !record.skipped() {
            line.set_comment(time_comment(record));
        }

        self.set.push(line).render(Mode::Flat)
    }

    fn record_nested(&mut self, record: &TestRecord) -> String {
        let mut out = String::new();

        if record.suite != self.current_suite {
            out.push_str(&self.flush_suite());
            self.current_suite = record.suite.clone();
            self.suites_emitted += 1;
            self.tests_in_suite = 0;
            self.failures_in_suite = 0;
            out.push_str(&format!("    # Subtest: {}\n", record.suite));
        }

        let failed = record.failed() || record.has_fatal_failure();
        let status = if failed { Status::NotOk } else { Status::Ok };
        let mut line = TapLine::new(status, &record.name);
        line.set_skip(record.skipped());

        if failed && !record.skipped() {
            self.failures_in_suite += 1;
            line.set_diagnostic(diagnostic_block(&record.parts));
        } else if !failed && !record.skipped() {
            line.set_comment(time_comment(record));
        }

        self.tests_in_suite += 1;
        line.set_number(self.tests_in_suite);
        out.push_str(&line.render(Mode::Nested));
        out
    }

    // Emits the pending suite's plan and summary. Nothing is emitted until
    // the suite has recorded at least one test, so the phantom "suite"
    // before the first real one never produces output.
    fn flush_suite(&self) -> String {
        if self.tests_in_suite == 0 {
            return String::new();
        }

        let status = if self.failures_in_suite > 0 {
            Status::NotOk
        } else {
            Status::Ok
        };
        format!(
            "    1..{}\n{} {} {}\n",
            self.tests_in_suite, status, self.suites_emitted, self.current_suite
        )
    }
}

// Source elapsed times are millisecond precision; TAP consumers expect
// seconds.
fn time_comment(record: &TestRecord) -> String {
    let secs = record.elapsed().num_milliseconds() as f64 / 1000.0;
    format!("time={}s", secs)
}
