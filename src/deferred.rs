//! Deferred session actions
//!
//! Answers schedule follow-up work (reverting the feedback signal, moving to
//! the next interval prompt) for a later instant. Tasks sit in a min-heap
//! ordered by `(due, sequence)` and are drained by the controller loop.
//!
//! Every task carries the epoch of the session that scheduled it. Starting,
//! stopping or replacing a session bumps the epoch and cancels older tasks;
//! a task whose epoch no longer matches is dropped when it fires.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use tokio::time::Instant;

/// Generation counter identifying one live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Epoch(pub u64);

impl Epoch {
    pub fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch {}", self.0)
    }
}

/// What a deferred task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Return feedback to neutral unless a newer answer replaced it
    RevertFeedback { answer: u64 },
    /// Clear the last answer and present a fresh interval prompt
    NextIntervalPrompt { answer: u64 },
}

#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub due: Instant,
    /// Tiebreak for tasks due at the same instant; lower fires first
    pub sequence: u64,
    pub epoch: Epoch,
    pub action: DeferredAction,
}

// Min-heap: earliest (due, sequence) fires first.
impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Pending deferred tasks
#[derive(Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<ScheduledTask>,
    next_sequence: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, epoch: Epoch, action: DeferredAction) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledTask {
            due,
            sequence,
            epoch,
            action,
        });
    }

    /// Deadline of the earliest pending task
    pub fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|task| task.due)
    }

    /// Remove and return the earliest task if it is due at `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<ScheduledTask> {
        if self.heap.peek()?.due <= now {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Drop every task scheduled before `epoch`
    pub fn cancel_before(&mut self, epoch: Epoch) {
        self.heap.retain(|task| task.epoch >= epoch);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pending tasks in firing order
    pub fn pending(&self) -> Vec<ScheduledTask> {
        let mut tasks = self.heap.clone().into_sorted_vec();
        // into_sorted_vec is ascending by Ord, which is reversed here
        tasks.reverse();
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tasks_fire_in_due_order() {
        let start = Instant::now();
        let mut queue = TaskQueue::new();
        queue.schedule(
            start + Duration::from_millis(1000),
            Epoch(1),
            DeferredAction::NextIntervalPrompt { answer: 1 },
        );
        queue.schedule(
            start + Duration::from_millis(500),
            Epoch(1),
            DeferredAction::RevertFeedback { answer: 1 },
        );

        assert_eq!(queue.next_due(), Some(start + Duration::from_millis(500)));
        assert!(queue.pop_due(start).is_none());

        let later = start + Duration::from_secs(2);
        let first = queue.pop_due(later).unwrap();
        assert_eq!(first.action, DeferredAction::RevertFeedback { answer: 1 });
        let second = queue.pop_due(later).unwrap();
        assert_eq!(second.action, DeferredAction::NextIntervalPrompt { answer: 1 });
        assert!(queue.pop_due(later).is_none());
    }

    #[test]
    fn test_same_deadline_keeps_schedule_order() {
        let due = Instant::now();
        let mut queue = TaskQueue::new();
        queue.schedule(due, Epoch(0), DeferredAction::RevertFeedback { answer: 1 });
        queue.schedule(due, Epoch(0), DeferredAction::RevertFeedback { answer: 2 });

        let order: Vec<_> = queue.pending().into_iter().map(|t| t.action).collect();
        assert_eq!(
            order,
            vec![
                DeferredAction::RevertFeedback { answer: 1 },
                DeferredAction::RevertFeedback { answer: 2 },
            ]
        );
    }

    #[test]
    fn test_cancel_before_drops_older_epochs() {
        let due = Instant::now();
        let mut queue = TaskQueue::new();
        queue.schedule(due, Epoch(1), DeferredAction::RevertFeedback { answer: 1 });
        queue.schedule(due, Epoch(2), DeferredAction::RevertFeedback { answer: 1 });

        queue.cancel_before(Epoch(2));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending()[0].epoch, Epoch(2));

        queue.cancel_before(Epoch(3));
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
    }
}
