//! Private module for selective re-export.

use crate::time::Time;
use std::io::Write;
use std::time::Duration;

/// The data sent during a report event.
#[derive(Clone, Debug)]
pub struct ReportData {
    /// Receptions committed so far during this advance.
    pub receptions: usize,
    /// Actors created so far during this advance.
    pub added: usize,
    /// Actors removed so far during this advance.
    pub removed: usize,
    /// The instant the universe is advancing toward.
    pub target: Time,
    /// How long the advance has been running.
    pub duration: Duration,
    /// Whether the advance is done.
    pub done: bool,
}

/// A reporter for progress while the universe advances.
pub trait Reporter {
    /// Report a progress event.
    fn report_advancing(&mut self, data: ReportData);

    /// How long to wait between progress events.
    fn delay(&self) -> Duration {
        Duration::from_millis(1_000)
    }
}

/// A [`Reporter`] that writes progress lines to the wrapped writer.
pub struct WriteReporter<'a, W> {
    writer: &'a mut W,
}

impl<'a, W> WriteReporter<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<W> Reporter for WriteReporter<'_, W>
where
    W: Write,
{
    fn report_advancing(&mut self, data: ReportData) {
        if data.done {
            let _ = writeln!(
                self.writer,
                "Done. receptions={}, added={}, removed={}, sec={}",
                data.receptions,
                data.added,
                data.removed,
                data.duration.as_secs(),
            );
        } else {
            let _ = writeln!(
                self.writer,
                "Advancing. receptions={}, added={}, removed={}",
                data.receptions, data.added, data.removed,
            );
        }
    }
}
