//! Remaining-time presentation and the one-second ticker that drives it.

use std::time::{Duration, Instant};

use crate::cycle::{Clock, CycleManager};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const APP_TITLE: &str = "cycletimer";

pub fn remaining_seconds(total: u64, elapsed: u64) -> u64 {
    total.saturating_sub(elapsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
}

impl Countdown {
    /// Countdown for whichever cycle the active pointer refers to.
    pub fn of<C: Clock>(manager: &CycleManager<C>) -> Self {
        let total_seconds = manager.current_cycle().map_or(0, |cycle| cycle.total_seconds());
        Self {
            total_seconds,
            remaining_seconds: remaining_seconds(total_seconds, manager.amount_seconds_passed()),
        }
    }

    pub fn minutes(&self) -> String {
        format!("{:02}", self.remaining_seconds / 60)
    }

    pub fn seconds(&self) -> String {
        format!("{:02}", self.remaining_seconds % 60)
    }

    pub fn display(&self) -> String {
        format!("{}:{}", self.minutes(), self.seconds())
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }
}

/// Title shown by the terminal while a cycle runs.
pub fn window_title<C: Clock>(manager: &CycleManager<C>) -> String {
    match manager.active_cycle() {
        Some(cycle) => format!("{} • {}", Countdown::of(manager).display(), cycle.task),
        None => APP_TITLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced(u64),
    Finished,
}

/// Recomputes elapsed time of the running cycle from the wall clock. The
/// counter never moves backwards, and a counter already at the target
/// finishes the cycle.
pub fn tick<C: Clock>(manager: &mut CycleManager<C>) -> TickOutcome {
    let Some(cycle) = manager.active_cycle() else {
        return TickOutcome::Idle;
    };

    let total = cycle.total_seconds();
    let elapsed = cycle
        .elapsed_seconds_at(manager.clock().now())
        .max(manager.amount_seconds_passed());

    if remaining_seconds(total, elapsed) == 0 {
        manager.mark_active_cycle_finished();
        manager.set_seconds_passed(total);
        TickOutcome::Finished
    } else {
        manager.set_seconds_passed(elapsed);
        TickOutcome::Advanced(elapsed)
    }
}

// ============================================================================
// Ticker
// ============================================================================

/// Fires once per interval. Dropping it cancels it.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self { interval, next_due: now + interval }
    }

    /// Returns true when an interval boundary has passed since the last fire.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            // Missed several intervals; skip ahead instead of firing in a burst.
            self.next_due = now + self.interval;
        }
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
