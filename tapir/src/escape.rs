//! Escaping for diagnostic text embedded in TAP output

// Stands in for pre-escaped newlines while real newlines are rewritten.
// A control byte won't show up in sane assertion text.
const ESCAPED_NEWLINE_SENTINEL: &str = "\u{1}";

/// Make a raw diagnostic message safe for a quoted, single-line TAP/YAML
/// field.
///
/// Double quotes become `\"` and literal newlines become the two-character
/// sequence `\n`. A message that already contains the two-character `\n`
/// keeps it, doubly escaped: the pre-escaped form is swapped for a sentinel
/// before the real-newline substitution runs, so the two can never be
/// confused.
///
/// Any input is valid, including the empty string.
pub fn escape_message(raw: &str) -> String {
    raw.replace('"', "\\\"")
        .replace("\\n", ESCAPED_NEWLINE_SENTINEL)
        .replace('\n', "\\n")
        .replace(ESCAPED_NEWLINE_SENTINEL, "\\\\n")
}

/// Strip leading whitespace from a failure-part summary.
///
/// Host frameworks indent their assertion output; that indentation is
/// noise inside a diagnostic block.
pub fn left_strip(input: &str) -> &str {
    input.trim_start()
}
