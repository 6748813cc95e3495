//! An event sent to reporters

use crate::record::TestRecord;
use std::sync::Arc;

/// An event sent to reporters
#[derive(Debug, Clone)]
pub enum Event {
    /// The test program has started
    Started,
    /// A single test has finished
    TestFinished(Arc<TestRecord>),
    /// The test program has finished
    Ended,
}
