//! A single TAP result line

use crate::escape::{escape_message, left_strip};
use crate::record::PartRecord;
use crate::session::Mode;
use std::fmt;

/// Outcome classification for one TAP result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The test passed
    Ok,
    /// The test failed
    NotOk,
    /// The test failed fatally; consumers should consider the rest of the
    /// stream unrunnable
    BailOut,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "ok",
            Status::NotOk => "not ok",
            Status::BailOut => "Bail out!",
        };
        f.write_str(s)
    }
}

/// One finished test, ready to be rendered as a TAP result line.
///
/// Built fresh per test-end event, numbered at emission time, rendered,
/// then discarded.
#[derive(Debug, Clone)]
pub struct TapLine {
    /// 1-based ordinal within its scope: the suite in nested mode, the
    /// whole run in flat mode. Assigned at emission time.
    pub number: usize,
    /// Outcome classification
    pub status: Status,
    /// Test name as reported by the host framework
    pub name: String,
    /// Trailing comment without the leading `#`; empty means no comment
    /// is emitted
    pub comment: String,
    /// The framework filtered this test out
    pub skip: bool,
    /// Pre-rendered diagnostic block emitted after a failing nested line
    pub diagnostic: Option<String>,
}

impl TapLine {
    /// Create an unnumbered line with no comment.
    pub fn new<N: Into<String>>(status: Status, name: N) -> Self {
        Self {
            number: 0,
            status,
            name: name.into(),
            comment: String::new(),
            skip: false,
            diagnostic: None,
        }
    }

    /// Set the ordinal within the line's scope.
    pub fn set_number(&mut self, number: usize) -> &mut Self {
        self.number = number;
        self
    }

    /// Set the trailing comment (without the leading `#`).
    pub fn set_comment<C: Into<String>>(&mut self, comment: C) -> &mut Self {
        self.comment = comment.into();
        self
    }

    /// Mark the line as skipped. Skipped lines carry a `SKIP` directive
    /// regardless of their status.
    pub fn set_skip(&mut self, skip: bool) -> &mut Self {
        self.skip = skip;
        self
    }

    /// Attach a diagnostic block, rendered after the line in nested mode.
    pub fn set_diagnostic<D: Into<String>>(&mut self, diagnostic: D) -> &mut Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// The comment suffix for the result line, including the leading `#`.
    /// The `SKIP` directive wins over any other comment.
    fn comment_suffix(&self) -> String {
        if self.skip {
            String::from(" # SKIP")
        } else if !self.comment.is_empty() {
            format!(" # {}", self.comment)
        } else {
            String::new()
        }
    }

    /// Render the line (and any diagnostic block) for the given mode. The
    /// returned text is newline terminated.
    pub fn render(&self, mode: Mode) -> String {
        match mode {
            Mode::Flat => self.render_flat(),
            Mode::Nested => self.render_nested(),
        }
    }

    fn render_flat(&self) -> String {
        match self.status {
            // A bail-out replaces the result line; it has no number or
            // directive slot.
            Status::BailOut => format!("Bail out! {}\n", self.name),
            _ => format!(
                "{} {} {}{}\n",
                self.status,
                self.number,
                self.name,
                self.comment_suffix()
            ),
        }
    }

    fn render_nested(&self) -> String {
        let mut out = format!(
            "    {} {} {}{}\n",
            self.status,
            self.number,
            self.name,
            self.comment_suffix()
        );
        if let Some(diag) = &self.diagnostic {
            out.push_str(diag);
        }
        out
    }
}

/// Render the YAML diagnostic block for a test's failed parts.
///
/// Each failed part contributes one `error:` entry with the assertion's
/// source location and its left-stripped, escaped message. Missing file or
/// line information is rendered as `(unknown)` so the block stays
/// structurally well formed.
pub fn diagnostic_block(parts: &[PartRecord]) -> String {
    let mut body = String::from("---\n");

    for part in parts.iter().filter(|p| p.failed) {
        let file = part.file.as_deref().unwrap_or("(unknown)");
        let line = match part.line {
            Some(n) => n.to_string(),
            None => String::from("(unknown)"),
        };
        body.push_str("error:\n");
        body.push_str(&format!("  stack: {}:{}\n", file, line));
        body.push_str(&format!(
            "  message: \"{}\"\n",
            escape_message(left_strip(&part.summary))
        ));
    }

    body.push_str("...\n");
    format!("    # Diagnostic\n{}", textwrap::indent(&body, "      "))
}
