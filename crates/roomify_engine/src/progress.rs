use std::time::Duration;

use roomify_core::{ProgressCounter, ProgressTick, UploadSettings};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shortest tick period the timer runs with.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Repeating timer that walks a [`ProgressCounter`] from 0 to 100.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSimulator {
    period: Duration,
    step: u8,
}

/// Owned handle to a running simulation. Dropping it stops the timer.
#[derive(Debug)]
pub struct ProgressHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ProgressHandle {
    pub fn cancel(self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ProgressSimulator {
    /// A zero `period` is raised to [`MIN_PERIOD`]; the step is guarded by
    /// [`ProgressCounter`].
    pub fn new(period: Duration, step: u8) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            step,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(settings.tick_interval, settings.progress_step)
    }

    pub fn start<F>(&self, on_tick: F) -> ProgressHandle
    where
        F: FnMut(ProgressTick) + Send + 'static,
    {
        self.start_linked(CancellationToken::new(), on_tick)
    }

    /// Like [`start`](Self::start), but the timer also stops when `parent` is cancelled.
    pub fn start_linked<F>(&self, parent: CancellationToken, mut on_tick: F) -> ProgressHandle
    where
        F: FnMut(ProgressTick) + Send + 'static,
    {
        let cancel = parent.child_token();
        let stop = cancel.clone();
        let period = self.period;
        let mut counter = ProgressCounter::new(self.step);

        let task = tokio::spawn(async move {
            // First tick one full period after start, like a browser interval.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        let tick = counter.advance();
                        on_tick(tick);
                        if tick.reached_complete {
                            break;
                        }
                    }
                }
            }
        });

        ProgressHandle { cancel, task }
    }
}
