#![warn(missing_docs)]

//! Tapir: a TAP version 13 reporter for test events
//! =================================================
//!
//! Tapir watches the lifecycle events of a test program (program start,
//! per-test completion, program end) and emits a conformant [TAP version
//! 13][1] transcript as the events arrive. It does not run tests itself;
//! the host framework does that and feeds tapir the results. Its goals
//! are:
//!
//! 1. **Incremental output**: every event is rendered and written before
//!    the next one is taken, so the transcript can be tailed live.
//! 2. **Two aggregation policies**: a nested mode that renders each test
//!    suite as a TAP subtest with its own plan and summary, and a flat
//!    mode with one global test counter and a single final plan.
//! 3. **Reusability**: reporters are registered by name and selected from
//!    the command line, so a host framework can swap or stack them.
//!
//! (The name is short for "TAP reporter". The animal is a bonus.)
//!
//! [1]: https://testanything.org/tap-version-13-specification.html

pub mod escape;
pub mod event;
pub mod line;
pub mod options;
pub mod record;
pub mod reporter;
pub mod session;
pub mod set;

pub use escape::*;
pub use event::*;
pub use line::*;
pub use options::*;
pub use record::*;
pub use reporter::*;
pub use session::*;
pub use set::*;
