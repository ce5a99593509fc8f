//! Runs one blocking call on a background task while the caller ticks a
//! progress indicator.
//!
//! The worker is raced against a fixed-period interval. Each tick reports a
//! [`Progress`] to the caller's callback; the wait ends as soon as the worker
//! resolves, or after `max_ticks` ticks, whichever comes first.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSettings {
    pub tick: Duration,
    pub max_ticks: u32,
}

impl ProgressSettings {
    /// Longest the caller will wait, saturating instead of overflowing.
    pub fn ceiling(&self) -> Duration {
        self.tick.checked_mul(self.max_ticks).unwrap_or(Duration::MAX)
    }
}

/// Snapshot handed to the tick callback. `tick` counts from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub tick: u32,
    pub max_ticks: u32,
}

impl Progress {
    /// Countdown value shown to the user, starting at `max_ticks`.
    pub fn remaining(&self) -> u32 {
        self.max_ticks.saturating_sub(self.tick)
    }

    pub fn fraction(&self) -> f32 {
        if self.max_ticks == 0 {
            return 1.0;
        }
        (self.tick + 1) as f32 / self.max_ticks as f32
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("No response after {waited:?} of waiting ({ticks} checks)")]
    CeilingReached { waited: Duration, ticks: u32 },
    #[error("The background worker failed: {0}")]
    Worker(#[from] JoinError),
}

pub async fn run_with_progress<F, T>(
    settings: ProgressSettings,
    work: F,
    mut on_tick: impl FnMut(Progress),
) -> Result<T, WaitError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut worker = tokio::spawn(work);
    let mut ticker = interval(settings.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick = 0;
    loop {
        tokio::select! {
            biased;

            joined = &mut worker => return joined.map_err(WaitError::from),
            _ = ticker.tick() => {
                if tick >= settings.max_ticks {
                    worker.abort();
                    return Err(WaitError::CeilingReached {
                        waited: settings.ceiling(),
                        ticks: settings.max_ticks,
                    });
                }
                on_tick(Progress {
                    tick,
                    max_ticks: settings.max_ticks,
                });
                tick += 1;
            }
        }
    }
}
