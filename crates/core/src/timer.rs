//! Wall-clock timing of a single interpreter execution

use std::time::{Duration, Instant};

/// Measures how long one execution took.
///
/// Both timestamps stay `None` until set. `stop` before `start` is ignored,
/// so a stopped timer always satisfies `stopped_at >= started_at`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer, clearing any previous stop time
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.stopped_at = None;
    }

    pub fn stop(&mut self) {
        if self.started_at.is_some() {
            self.stopped_at = Some(Instant::now());
        }
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn stopped_at(&self) -> Option<Instant> {
        self.stopped_at
    }

    /// Elapsed time between start and stop.
    ///
    /// A running timer reports the time elapsed so far; an unstarted one
    /// reports zero.
    pub fn duration(&self) -> Duration {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }
}
