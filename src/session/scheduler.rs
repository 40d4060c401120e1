//! Fixed-interval tick driver.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Fires ticks at a fixed period while started.
///
/// There is at most one underlying timer: `start` on a running scheduler is
/// ignored and `restart` replaces the timer. A stopped scheduler never
/// yields a tick, so awaiting [`TickScheduler::tick`] in a `select!` simply
/// parks that branch.
#[derive(Debug, Default)]
pub struct TickScheduler {
    timer: Option<Interval>,
    period: Option<Duration>,
    fired: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`; the first tick comes one period from now.
    ///
    /// Returns `false` if the scheduler was already running.
    pub fn start(&mut self, period: Duration) -> bool {
        if self.timer.is_some() {
            log::warn!("tick scheduler already running, ignoring start");
            return false;
        }

        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
        self.period = Some(period);
        log::debug!("tick scheduler started, period {:?}", period);
        true
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            log::debug!("tick scheduler stopped after {} ticks", self.fired);
        }
        self.period = None;
    }

    /// Stop any running timer, then start a new one
    pub fn restart(&mut self, period: Duration) {
        self.stop();
        self.fired = 0;
        self.start(period);
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Ticks delivered since the last restart
    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }

    /// Wait for the next tick. Never completes while stopped.
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
                self.fired += 1;
            }
            None => std::future::pending().await,
        }
    }
}
