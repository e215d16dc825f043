//! Cancellable deadlines and the reaction meter tick.
//!
//! Both live inside the session worker and are polled from its `select!`
//! loop, so a timer can never race a player command.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep, interval_at, sleep};

use game_core::ReactionSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeadlineKind {
    Turn,
    Idle,
    Reaction,
}

/// At most one armed deadline per session.
#[derive(Default)]
pub(crate) struct TimeoutSupervisor {
    armed: Option<(DeadlineKind, Pin<Box<Sleep>>)>,
}

impl TimeoutSupervisor {
    /// Replaces any armed deadline.
    pub(crate) fn arm(&mut self, kind: DeadlineKind, after: Duration) {
        self.armed = Some((kind, Box::pin(sleep(after))));
    }

    pub(crate) fn disarm(&mut self) {
        self.armed = None;
    }

    pub(crate) fn armed(&self) -> Option<DeadlineKind> {
        self.armed.as_ref().map(|(kind, _)| *kind)
    }

    /// Resolves when the armed deadline passes; pending forever when unarmed.
    pub(crate) async fn expired(&mut self) -> DeadlineKind {
        match self.armed.as_mut() {
            Some((kind, timer)) => {
                let kind = *kind;
                timer.as_mut().await;
                self.armed = None;
                kind
            }
            None => pending().await,
        }
    }
}

/// Fills the reaction bar one cell per tick.
pub(crate) struct ReactionMeter {
    pub(crate) spec: ReactionSpec,
    started: Instant,
    ticks: Interval,
    last_step: u64,
}

impl ReactionMeter {
    pub(crate) fn start(spec: ReactionSpec) -> Self {
        let started = Instant::now();
        let period = Duration::from_millis(spec.tick_ms.max(1));
        let mut ticks = interval_at(started + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            spec,
            started,
            ticks,
            last_step: 1,
        }
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Next tick at which the bar grew. Pending once the bar is full.
    pub(crate) async fn advance(&mut self) -> u64 {
        loop {
            if self.last_step >= self.spec.bar_len() {
                return pending().await;
            }
            self.ticks.tick().await;
            let step = self.spec.step_at(self.elapsed_ms());
            if step > self.last_step {
                self.last_step = step;
                return step;
            }
        }
    }
}

/// Polls an optional meter; pending when there is none.
pub(crate) async fn next_step(meter: &mut Option<ReactionMeter>) -> u64 {
    match meter.as_mut() {
        Some(meter) => meter.advance().await,
        None => pending().await,
    }
}

/// Awaits a one-shot delay and clears it; pending when there is none.
pub(crate) async fn elapse(delay: &mut Option<Pin<Box<Sleep>>>) {
    match delay.as_mut() {
        Some(timer) => {
            timer.as_mut().await;
            *delay = None;
        }
        None => pending().await,
    }
}
