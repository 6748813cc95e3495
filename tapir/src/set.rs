//! An ordered collection of results for flat-mode runs

use crate::line::TapLine;
use crate::session::Mode;

/// An append-only, insertion-ordered collection of [`TapLine`]s. Used in
/// flat mode, where one counter numbers every test across the whole run.
#[derive(Debug, Default)]
pub struct TestSet {
    results: Vec<TapLine>,
}

impl TestSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result, assigning it the next ordinal. Ordinals are
    /// contiguous from 1 for the lifetime of the set; there is no removal.
    pub fn push(&mut self, mut result: TapLine) -> &TapLine {
        result.number = self.results.len() + 1;
        self.results.push(result);
        // just pushed, so the set can't be empty
        self.results.last().unwrap()
    }

    /// Number of results recorded so far.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if no result has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over the recorded results in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TapLine> {
        self.results.iter()
    }

    /// Render every contained result in insertion order, one line each.
    pub fn serialize(&self) -> String {
        self.results.iter().map(|r| r.render(Mode::Flat)).collect()
    }
}
