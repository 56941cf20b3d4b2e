//! Deterministic logical-time timer queue.
//!
//! Every periodic behaviour of a session (the driver tick, per-entity motion,
//! boss fire, fire-cooldown decay, delayed stage advance) is a timer in one
//! [`Scheduler`]. Timers fire in `(due time, creation order)` order, so two
//! runs fed the same inputs observe the same interleaving.
//!
//! Firing is split in two so the caller can run the timer body with full
//! access to the game state:
//!
//! 1. [`Scheduler::pop_due`] removes the earliest due timer and advances the
//!    clock to its due time.
//! 2. The caller runs the body (which may schedule or cancel timers,
//!    including the one that fired).
//! 3. [`Scheduler::rearm`] puts a repeating timer back in the queue unless it
//!    was cancelled while running.
//!
//! # Example
//!
//! ```
//! use starfall_core::scheduler::{Scheduler, TimerTask};
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.schedule_repeating(TimerTask::Frame, 100, None);
//! scheduler.schedule_once(TimerTask::StageAdvance, 250, None);
//!
//! let mut fired = Vec::new();
//! while let Some(timer) = scheduler.pop_due(300) {
//!     fired.push((scheduler.now(), timer.task));
//!     scheduler.rearm(timer.id);
//! }
//! scheduler.advance_to(300);
//!
//! assert_eq!(
//!     fired,
//!     vec![
//!         (100, TimerTask::Frame),
//!         (200, TimerTask::Frame),
//!         (250, TimerTask::StageAdvance),
//!         (300, TimerTask::Frame),
//!     ]
//! );
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::EntityId;

/// Handle of a scheduled timer. Never reused within a scheduler.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({})", self.0)
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerTask {
    /// Driver tick: runs the update engine.
    Frame,
    /// One motion step of an entity.
    Motion(EntityId),
    /// Boss spawns an enemy laser.
    BossFire(EntityId),
    /// Hero fire cooldown decays by one step.
    CooldownDecay(EntityId),
    /// Delayed stage advance after a meteor clear.
    StageAdvance,
}

/// A timer returned by [`Scheduler::pop_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// Handle to cancel or rearm the timer
    pub id: TimerId,
    /// The task to run
    pub task: TimerTask,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    task: TimerTask,
    /// `None` for one-shot timers.
    period: Option<u64>,
    owner: Option<EntityId>,
    due: u64,
    seq: u64,
}

/// Logical-time timer queue.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_id: u64,
    next_seq: u64,
    /// Pending firings keyed by `(due, seq)`.
    queue: BTreeMap<(u64, u64), TimerId>,
    /// Live timers, including one that is mid-firing.
    timers: BTreeMap<TimerId, TimerEntry>,
}

impl Scheduler {
    /// Creates an empty scheduler at time 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Schedules `task` every `period_ms`, first firing one period from now.
    ///
    /// A zero period is treated as 1 ms so the queue always makes progress.
    pub fn schedule_repeating(
        &mut self,
        task: TimerTask,
        period_ms: u64,
        owner: Option<EntityId>,
    ) -> TimerId {
        let period = period_ms.max(1);
        self.insert(task, Some(period), owner, period)
    }

    /// Schedules `task` once, `delay_ms` from now.
    pub fn schedule_once(
        &mut self,
        task: TimerTask,
        delay_ms: u64,
        owner: Option<EntityId>,
    ) -> TimerId {
        self.insert(task, None, owner, delay_ms)
    }

    fn insert(
        &mut self,
        task: TimerTask,
        period: Option<u64>,
        owner: Option<EntityId>,
        delay: u64,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        let seq = self.bump_seq();
        self.queue.insert((due, seq), id);
        self.timers.insert(
            id,
            TimerEntry {
                task,
                period,
                owner,
                due,
                seq,
            },
        );
        trace!(?id, ?task, due, "timer scheduled");
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancels a timer. Returns `false` if it was already gone.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(entry) = self.timers.remove(&id) else {
            return false;
        };
        self.queue.remove(&(entry.due, entry.seq));
        trace!(?id, task = ?entry.task, "timer cancelled");
        true
    }

    /// Cancels every timer owned by `owner` and returns how many were live.
    pub fn cancel_owned_by(&mut self, owner: EntityId) -> usize {
        let owned: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.owner == Some(owner))
            .map(|(id, _)| *id)
            .collect();
        for id in &owned {
            self.cancel(*id);
        }
        owned.len()
    }

    /// Drops every timer. The clock keeps its value.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.timers.clear();
    }

    /// Number of live timers.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of live timers owned by `owner`.
    #[must_use]
    pub fn owned_count(&self, owner: EntityId) -> usize {
        self.timers
            .values()
            .filter(|entry| entry.owner == Some(owner))
            .count()
    }

    /// Number of live timers running `task`.
    #[must_use]
    pub fn count_task(&self, task: TimerTask) -> usize {
        self.timers.values().filter(|entry| entry.task == task).count()
    }

    /// Removes the earliest timer due at or before `until` and moves the
    /// clock to its due time.
    ///
    /// One-shot timers are gone after this call; repeating timers stay live
    /// until [`Scheduler::rearm`] or [`Scheduler::cancel`].
    pub fn pop_due(&mut self, until: u64) -> Option<FiredTimer> {
        let (&(due, seq), &id) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        self.queue.remove(&(due, seq));
        self.now = self.now.max(due);

        let task = self.timers.get(&id)?.task;
        if self.timers.get(&id).is_some_and(|entry| entry.period.is_none()) {
            self.timers.remove(&id);
        }
        Some(FiredTimer { id, task })
    }

    /// Requeues a repeating timer one period after the current time.
    ///
    /// Does nothing for one-shot timers or timers cancelled while firing.
    pub fn rearm(&mut self, id: TimerId) {
        let Some(period) = self.timers.get(&id).and_then(|entry| entry.period) else {
            return;
        };
        let due = self.now + period;
        let seq = self.bump_seq();
        if let Some(entry) = self.timers.get_mut(&id) {
            entry.due = due;
            entry.seq = seq;
        }
        self.queue.insert((due, seq), id);
    }

    /// Moves the clock forward to `until` once nothing else is due.
    pub fn advance_to(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}
