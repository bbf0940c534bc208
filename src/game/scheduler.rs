//! Cancellable deferred hide of a mismatched pair.
//!
//! After a mismatch both cards stay visible for the configured delay, then a
//! deferred task turns them back over. The scheduler holds at most one such
//! task. Every task gets a fresh `TaskId`; a task that was cancelled or
//! already resolved can never be claimed again, so a late timer callback is
//! a no-op instead of touching the next round's cards.
//!
//! Time is a logical clock moved forward by `advance`. The clock saturates
//! at `Duration::MAX`. Callers with a real timer can ignore the clock and
//! claim a task by id instead.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of one scheduled hide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// A pending "hide both cards" action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledHide {
    pub task: TaskId,
    /// The two face-up cards to turn back over.
    pub positions: [usize; 2],
    /// Reveal window requested at scheduling time.
    pub delay: Duration,
    /// Logical time at which the task becomes due.
    pub due: Duration,
}

/// Holds the single pending hide task and the logical clock.
#[derive(Clone, Debug, Default)]
pub struct HideScheduler {
    now: Duration,
    next_task: u64,
    pending: Option<ScheduledHide>,
}

impl HideScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The pending task, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&ScheduledHide> {
        self.pending.as_ref()
    }

    /// Schedule a hide `delay` from now, replacing any pending task.
    pub fn schedule(&mut self, positions: [usize; 2], delay: Duration) -> ScheduledHide {
        self.next_task += 1;
        let hide = ScheduledHide {
            task: TaskId(self.next_task),
            positions,
            delay,
            due: self.now.saturating_add(delay),
        };
        self.pending = Some(hide);
        hide
    }

    /// Drop the pending task without running it.
    pub fn cancel(&mut self) -> Option<ScheduledHide> {
        self.pending.take()
    }

    /// Claim the pending task regardless of time.
    pub fn take(&mut self) -> Option<ScheduledHide> {
        self.pending.take()
    }

    /// Claim the pending task only if it is `task`.
    pub fn take_if(&mut self, task: TaskId) -> Option<ScheduledHide> {
        match self.pending {
            Some(hide) if hide.task == task => self.pending.take(),
            _ => None,
        }
    }

    /// Move the clock forward and claim the pending task if it became due.
    pub fn advance(&mut self, elapsed: Duration) -> Option<ScheduledHide> {
        self.now = self.now.saturating_add(elapsed);
        match self.pending {
            Some(hide) if hide.due <= self.now => self.pending.take(),
            _ => None,
        }
    }
}
