//! Cycle records and the state container that owns them.
//!
//! A [`CycleManager`] holds the append-only list of cycles, the pointer to the
//! active one and the elapsed-seconds counter fed by the countdown ticker.

use std::fmt;

use chrono::{DateTime, Local};
use tracing::{debug, info};

pub const MIN_MINUTES: u32 = 5;
pub const MAX_MINUTES: u32 = 60;

// ============================================================================
// Clock
// ============================================================================

/// Source of "now" for every timestamp a cycle carries.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

// ============================================================================
// Data Models
// ============================================================================

/// Identifier derived from the creation time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleId(i64);

impl CycleId {
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Running,
    Interrupted,
    Finished,
}

impl CycleStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Running => "Em andamento",
            Self::Interrupted => "Interrompido",
            Self::Finished => "Concluído",
        }
    }
}

/// Validated input for a new cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCycle {
    pub task: String,
    pub minutes_amount: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub id: CycleId,
    pub task: String,
    pub minutes_amount: u32,
    pub start_date: DateTime<Local>,
    pub interrupted_date: Option<DateTime<Local>>,
    pub finished_date: Option<DateTime<Local>>,
}

impl Cycle {
    pub fn status(&self) -> CycleStatus {
        match (self.interrupted_date, self.finished_date) {
            (Some(_), _) => CycleStatus::Interrupted,
            (None, Some(_)) => CycleStatus::Finished,
            (None, None) => CycleStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status() == CycleStatus::Running
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes_amount) * 60
    }

    /// Whole seconds between `start_date` and `now`, truncated, never negative.
    /// Follows the wall clock, so a clock stepped back shortens it.
    pub fn elapsed_seconds_at(&self, now: DateTime<Local>) -> u64 {
        (now - self.start_date).num_seconds().max(0) as u64
    }
}

// ============================================================================
// Cycle Manager
// ============================================================================

pub struct CycleManager<C: Clock = SystemClock> {
    cycles: Vec<Cycle>,
    active_cycle_id: Option<CycleId>,
    amount_seconds_passed: u64,
    clock: C,
}

impl CycleManager<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CycleManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CycleManager<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            cycles: Vec::new(),
            active_cycle_id: None,
            amount_seconds_passed: 0,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn active_cycle_id(&self) -> Option<CycleId> {
        self.active_cycle_id
    }

    /// The cycle the active pointer refers to, whatever its state.
    pub fn current_cycle(&self) -> Option<&Cycle> {
        let id = self.active_cycle_id?;
        self.cycles.iter().find(|cycle| cycle.id == id)
    }

    /// The cycle the active pointer refers to, only while it is still running.
    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.current_cycle().filter(|cycle| cycle.is_running())
    }

    pub fn amount_seconds_passed(&self) -> u64 {
        self.amount_seconds_passed
    }

    pub fn create_cycle(&mut self, new_cycle: NewCycle) -> &Cycle {
        debug_assert!(!new_cycle.task.trim().is_empty());
        debug_assert!((MIN_MINUTES..=MAX_MINUTES).contains(&new_cycle.minutes_amount));

        let now = self.clock.now();
        let id = self.next_id(now);

        info!(%id, task = %new_cycle.task, minutes = new_cycle.minutes_amount, "cycle created");

        self.cycles.push(Cycle {
            id,
            task: new_cycle.task,
            minutes_amount: new_cycle.minutes_amount,
            start_date: now,
            interrupted_date: None,
            finished_date: None,
        });
        self.active_cycle_id = Some(id);
        self.amount_seconds_passed = 0;

        &self.cycles[self.cycles.len() - 1]
    }

    /// Stamps the running active cycle as interrupted and clears the pointer.
    pub fn interrupt_active_cycle(&mut self) -> Option<&Cycle> {
        let id = self.active_cycle_id.take()?;
        let now = self.clock.now();
        let idx = self.cycles.iter().position(|cycle| cycle.id == id)?;

        let cycle = &mut self.cycles[idx];
        if !cycle.is_running() {
            debug!(%id, "active pointer cleared on a cycle that already ended");
            return None;
        }

        cycle.interrupted_date = Some(now);
        info!(%id, task = %cycle.task, "cycle interrupted");
        Some(&self.cycles[idx])
    }

    /// Stamps the active cycle as finished. The pointer stays set.
    pub fn mark_active_cycle_finished(&mut self) -> bool {
        let Some(id) = self.active_cycle_id else {
            return false;
        };
        let now = self.clock.now();

        match self.cycles.iter_mut().find(|cycle| cycle.id == id) {
            Some(cycle) if cycle.is_running() => {
                cycle.finished_date = Some(now);
                info!(%id, task = %cycle.task, "cycle finished");
                true
            }
            _ => false,
        }
    }

    pub fn set_seconds_passed(&mut self, seconds: u64) {
        self.amount_seconds_passed = seconds;
    }

    /// Distinct task names used so far, most recent first, matching `prefix`
    /// case-insensitively.
    pub fn task_suggestions(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        let mut seen: Vec<&str> = Vec::new();

        for cycle in self.cycles.iter().rev() {
            let task = cycle.task.as_str();
            if task.to_lowercase().starts_with(&prefix) && !seen.contains(&task) {
                seen.push(task);
            }
        }

        seen
    }

    fn next_id(&self, now: DateTime<Local>) -> CycleId {
        let millis = now.timestamp_millis();
        match self.cycles.last() {
            Some(last) if last.id.0 >= millis => CycleId(last.id.0 + 1),
            _ => CycleId(millis),
        }
    }
}
