//! Synthetic progress reporting for a single resolution call.
//!
//! A [`ProgressGuard`] owns a recurring timer task that nudges the reported
//! percentage upward while the network chain runs. Finishing the guard stops
//! the timer and emits the final `100`; dropping it unfinished only stops the
//! timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::config::ProgressConfig;
use crate::constants::progress::COMPLETE;

/// Receives progress percentages (0-100).
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn report(&self, percent: u8) {
        self(percent);
    }
}

/// Sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _percent: u8) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Running,
    Completed,
    Failed,
}

#[derive(Debug)]
struct Tracker {
    state: ResolutionState,
    percent: u8,
}

fn lock(tracker: &Mutex<Tracker>) -> MutexGuard<'_, Tracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ProgressGuard {
    tracker: Arc<Mutex<Tracker>>,
    sink: Arc<dyn ProgressSink>,
    ticker: Option<JoinHandle<()>>,
}

impl ProgressGuard {
    /// Starts the timer. Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(sink: Arc<dyn ProgressSink>, config: &ProgressConfig) -> Self {
        let tracker = Arc::new(Mutex::new(Tracker {
            state: ResolutionState::Running,
            percent: config.initial,
        }));

        let ticker = tokio::spawn(tick(
            Arc::clone(&tracker),
            Arc::clone(&sink),
            config.tick_interval(),
            config.step,
            config.ceiling,
        ));

        Self {
            tracker,
            sink,
            ticker: Some(ticker),
        }
    }

    #[must_use]
    pub fn state(&self) -> ResolutionState {
        lock(&self.tracker).state
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        lock(&self.tracker).percent
    }

    /// Moves to a terminal state, stops the timer and reports `100` once.
    pub fn finish(mut self, state: ResolutionState) {
        debug_assert_ne!(state, ResolutionState::Running);
        self.stop_ticker();

        let mut tracker = lock(&self.tracker);
        if tracker.state != ResolutionState::Running {
            return;
        }

        tracker.state = state;
        tracker.percent = COMPLETE;
        debug!(?state, "Resolution finished");
        self.sink.report(COMPLETE);
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.stop_ticker();

        // Abandoned mid-flight: silence any tick already past its await point.
        let mut tracker = lock(&self.tracker);
        if tracker.state == ResolutionState::Running {
            tracker.state = ResolutionState::Failed;
            debug!("Resolution abandoned before finishing");
        }
    }
}

async fn tick(
    tracker: Arc<Mutex<Tracker>>,
    sink: Arc<dyn ProgressSink>,
    period: Duration,
    step: u8,
    ceiling: u8,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut tracker = lock(&tracker);
        if tracker.state != ResolutionState::Running || tracker.percent >= ceiling {
            break;
        }

        tracker.percent = tracker.percent.saturating_add(step).min(ceiling);
        sink.report(tracker.percent);
    }
}
