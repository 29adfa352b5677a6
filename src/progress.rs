//! Progress reporting for a collection run
//!
//! The aggregator drives an observer with explicit signals: a heartbeat
//! tick while regions are in flight, one call per finished region, and a
//! single `on_done` once every region has been joined.

use crate::aws::CollectError;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, trace, warn};

/// Receives progress signals from the aggregator
pub trait ProgressObserver: Send + Sync {
    /// Heartbeat while collection is running
    fn on_tick(&self);

    /// A region finished, with its resource count or its error
    fn on_region_done(&self, region: &str, outcome: Result<usize, &CollectError>) {
        let _ = (region, outcome);
    }

    /// All regions have been joined
    fn on_done(&self, count: usize);
}

const FRAMES: &[&str] = &["importing", "importing.", "importing..", "importing..."];

/// Animated status line on stderr
pub struct Spinner {
    ticks: AtomicUsize,
    interactive: bool,
}

impl Spinner {
    /// Create a spinner; animation is skipped when stderr is not a terminal
    pub fn new() -> Self {
        Self {
            ticks: AtomicUsize::new(0),
            interactive: io::stderr().is_terminal(),
        }
    }

    /// Text shown for the given tick
    pub fn frame(tick: usize) -> &'static str {
        FRAMES[tick % FRAMES.len()]
    }

    fn redraw(&self, text: &str) {
        let _ = execute!(
            io::stderr(),
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(text)
        );
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for Spinner {
    fn on_tick(&self) {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        if self.interactive {
            self.redraw(Self::frame(tick));
        }
    }

    fn on_done(&self, count: usize) {
        if self.interactive {
            self.redraw("");
        }
        eprintln!("done importing {count} resources");
    }
}

/// Progress reporter that only logs (for `--quiet`)
#[derive(Debug, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_tick(&self) {
        trace!("Collection still running");
    }

    fn on_region_done(&self, region: &str, outcome: Result<usize, &CollectError>) {
        match outcome {
            Ok(count) => info!(region = %region, count, "Region finished"),
            Err(err) => warn!(region = %region, error = %err, "Region failed"),
        }
    }

    fn on_done(&self, count: usize) {
        info!(count, "Collection finished");
    }
}
