//! A trivial reporter that grabs the final run statistics

use super::Reporter;
use crate::event::Event;
use crate::session::RunStats;
use anyhow;
use async_broadcast as broadcast;
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::StreamExt;

/// A reporter that just sends the final run statistics somewhere. Often
/// useful for tests or custom follow-on processing.
pub struct Collect {
    dest: oneshot::Sender<RunStats>,
}

impl Collect {
    /// Create a new `Collect` object and a corresponding receiver for the
    /// final statistics
    pub fn new() -> (Self, oneshot::Receiver<RunStats>) {
        let (tx, rx) = oneshot::channel();
        (Self { dest: tx }, rx)
    }
}

#[async_trait]
impl Reporter for Collect {
    async fn report(
        self: Box<Self>,
        mut events: broadcast::Receiver<Event>,
    ) -> anyhow::Result<()> {
        let mut stats = RunStats::default();
        let mut ended = false;

        while let Some(event) = events.next().await {
            match event {
                Event::TestFinished(record) => stats.add(&record),
                Event::Ended => ended = true,
                Event::Started => (),
            }
        }

        if !ended {
            anyhow::bail!("Did not receive final test result");
        }

        let _ = self.dest.send(stats);
        Ok(())
    }
}
