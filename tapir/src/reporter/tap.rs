//! The TAP version 13 reporter

use super::{Reporter, ReporterEntry};
use crate::event::Event;
use crate::options::{ExtraOptionsFunc, TapOptions};
use crate::session::{Mode, Session};
use anyhow;
use async_broadcast as broadcast;
use async_std::io::{stdout, Stdout};
use async_trait::async_trait;
use clap::{App, Arg};
use futures::io::{AllowStdIo, AsyncWrite, AsyncWriteExt};
use futures::stream::StreamExt;
use std::fs;
use std::io::Write;

/// Reporter that prints a TAP version 13 transcript to a stream
pub struct TapReporter<T: AsyncWrite> {
    out: T,
    mode: Mode,
}

fn make_tap(_name: &str, options: &TapOptions) -> anyhow::Result<Box<dyn Reporter>> {
    make_with_mode(Mode::Nested, options)
}

fn make_tap_flat(_name: &str, options: &TapOptions) -> anyhow::Result<Box<dyn Reporter>> {
    make_with_mode(Mode::Flat, options)
}

fn make_with_mode(mode: Mode, options: &TapOptions) -> anyhow::Result<Box<dyn Reporter>> {
    // TODO: Make sure only one reporter can use "--output" at a time.
    match options.opts.value_of_os("output") {
        Some(path) => Ok(Box::new(
            TapReporter::from(fs::File::create(path)?).with_mode(mode),
        )),
        None => Ok(Box::new(TapReporter::default().with_mode(mode))),
    }
}

inventory::submit! {
    ReporterEntry {
        name: "tap".to_string(),
        func: make_tap,
    }
}

inventory::submit! {
    ReporterEntry {
        name: "tap-flat".to_string(),
        func: make_tap_flat,
    }
}

fn tap_options<'a>(app: App<'static, 'a>) -> App<'static, 'a> {
    app.arg(
        Arg::with_name("output")
            .short("o")
            .long("output")
            .value_name("FILE")
            .takes_value(true)
            .help("Output file for the TAP transcript. Default is stdout."),
    )
}

inventory::submit! { ExtraOptionsFunc::from(tap_options) }

impl<T: AsyncWrite + Send + Sync + 'static> From<T> for TapReporter<T> {
    fn from(out: T) -> Self {
        Self {
            out,
            mode: Mode::Nested,
        }
    }
}

impl<T: Write + Send + Sync + 'static> From<T> for TapReporter<AllowStdIo<T>> {
    fn from(out: T) -> Self {
        Self {
            out: AllowStdIo::new(out),
            mode: Mode::Nested,
        }
    }
}

impl Default for TapReporter<Stdout> {
    fn default() -> Self {
        Self::from(stdout())
    }
}

impl<T: AsyncWrite> TapReporter<T> {
    /// Select the aggregation policy. The default is [`Mode::Nested`].
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

#[async_trait]
impl<T: AsyncWrite + Send + Sync + 'static> Reporter for TapReporter<T> {
    async fn report(self: Box<Self>, events: broadcast::Receiver<Event>) -> anyhow::Result<()> {
        self.execute(events).await
    }
}

impl<T: AsyncWrite + Send + Sync + 'static> TapReporter<T> {
    async fn execute(self, mut events: broadcast::Receiver<Event>) -> anyhow::Result<()> {
        let mut session = Session::new(self.mode);

        let out = self.out;
        futures::pin_mut!(out);

        // One chunk per event, written in full before the next event is
        // taken, so lines for different tests never interleave.
        while let Some(event) = events.next().await {
            let chunk = session.handle(&event)?;
            if !chunk.is_empty() {
                out.write_all(chunk.as_ref()).await?;
            }
        }
        out.flush().await?;

        if !session.is_finished() {
            anyhow::bail!("Did not receive final test result");
        }

        // overall return code
        if session.stats().failed > 0 {
            anyhow::bail!("Test run failed");
        } else {
            Ok(())
        }
    }
}
