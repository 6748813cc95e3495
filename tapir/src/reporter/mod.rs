//! Writes output given test events

use crate::event::Event;
use crate::options::{ExtraOptionsFunc, TapOptions};
use anyhow;
use async_broadcast as broadcast;
use async_std::io::Stdout;
use async_trait::async_trait;
use clap::{App, Arg};
use futures::future::join_all;

pub mod collect;
pub mod tap;
pub use collect::*;
pub use tap::*;

/// A Reporter takes [`crate::Event`]s from the host test framework and
/// creates an output report from them.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Create an output report from input events. The return value is used
    /// to determine the final exit code.
    async fn report(self: Box<Self>, events: broadcast::Receiver<Event>) -> anyhow::Result<()>;
}

/// The default type of reporter to create if none are specified
pub type DefaultReporter = TapReporter<Stdout>;

/// A reporter entry for the by-name registry. Register with
/// `inventory::submit!`.
pub struct ReporterEntry {
    /// Name the reporter is requested by on the command line
    pub name: String,
    /// Factory for the reporter
    pub func: fn(name: &str, options: &TapOptions) -> anyhow::Result<Box<dyn Reporter>>,
}

inventory::collect!(ReporterEntry);

impl std::fmt::Debug for dyn Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Reporter")
    }
}

fn choose_reporter<'a>(app: App<'static, 'a>) -> App<'static, 'a> {
    app.arg(
        Arg::with_name("reporters")
            .multiple(true)
            .short("r")
            .long("reporter")
            .takes_value(true)
            .max_values(1)
            .value_name("NAME")
            .help("Add a reporter. If no reporter is given, a default reporter will be used"),
    )
}

inventory::submit! { ExtraOptionsFunc::from(choose_reporter) }

/// Create the reporters requested with `--reporter`, or the default
/// reporter if none were requested.
pub fn make_reporters(options: &TapOptions) -> anyhow::Result<Vec<Box<dyn Reporter>>> {
    let requested = match options.opts.values_of("reporters") {
        Some(r) => r,
        None => return Ok(vec![Box::new(DefaultReporter::default())]),
    };

    let entries: Vec<_> = inventory::iter::<ReporterEntry>().collect();
    let mut reporters = vec![];
    for req in requested {
        let reporter = match entries.iter().find(|e| e.name == req) {
            Some(e) => (e.func)(req, options)?,
            None => anyhow::bail!("No such reporter {}", req),
        };
        reporters.push(reporter);
    }

    Ok(reporters)
}

/// Fan one event stream out to every reporter, run them all to
/// completion, and return the first error.
pub async fn report_all(
    reporters: Vec<Box<dyn Reporter>>,
    events: broadcast::Receiver<Event>,
) -> anyhow::Result<()> {
    let futs: Vec<_> = reporters
        .into_iter()
        .map(|r| {
            let e = events.clone();
            async move { r.report(e).await }
        })
        .collect();
    drop(events);

    // await and return the first error
    let results = join_all(futs).await;
    for r in results {
        if r.is_err() {
            return r;
        }
    }

    Ok(())
}
