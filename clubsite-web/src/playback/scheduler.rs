//! One-shot timers for the reconciler
//!
//! The reconciler never sleeps. It asks a [`Scheduler`] for a timer and is
//! told later, through `on_timer_fired`, that the timer is due.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Purpose of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Re-issue play after a spurious pause
    Retry,
    /// Attach a widget to a freshly replaced embed source
    Rebind,
    /// Second half of ready priming
    PrimePause,
}

pub trait Scheduler {
    /// Arrange for `id` to be reported after `delay`
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId;

    /// Forget a timer; cancelling an unknown or fired timer does nothing
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTimer {
    id: TimerId,
    kind: TimerKind,
    due: Duration,
}

/// Scheduler on a virtual clock
///
/// Time only moves through [`SimulatedScheduler::advance`], which hands back
/// the timers that came due so the caller can fire them.
#[derive(Debug, Default)]
pub struct SimulatedScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
    scheduled: Vec<(TimerId, TimerKind)>,
    cancelled: Vec<TimerId>,
}

impl SimulatedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward, returning due timers in firing order
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;
        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| t.id).collect()
    }

    /// Outstanding timers of one kind
    pub fn pending(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|t| t.kind == kind).count()
    }

    pub fn pending_total(&self) -> usize {
        self.pending.len()
    }

    /// Every timer ever scheduled of one kind
    pub fn scheduled(&self, kind: TimerKind) -> usize {
        self.scheduled.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn cancelled(&self) -> &[TimerId] {
        &self.cancelled
    }
}

impl Scheduler for SimulatedScheduler {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(PendingTimer {
            id,
            kind,
            due: self.now + delay,
        });
        self.scheduled.push((id, kind));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        if self.pending.len() != before {
            self.cancelled.push(id);
        }
    }
}
