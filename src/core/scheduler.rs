//! # Deferred Task Queue
//!
//! A deadline-ordered queue of work that should happen "later". Nothing here
//! spawns threads or tasks: whoever owns the `Scheduler` decides when to
//! look at it, either by polling [`Scheduler::pop_due`] from an event loop or
//! by awaiting [`Scheduler::next`].
//!
//! Deadlines are measured on tokio's clock, so under
//! `#[tokio::test(start_paused = true)]` tests can jump time forward with
//! `tokio::time::advance` instead of really waiting.
//!
//! ```text
//! schedule(500ms, A)   schedule(500ms, B)   schedule(200ms, C)
//!        │                    │                    │
//!        ▼                    ▼                    ▼
//!   heap: (t+200, #3, C) < (t+500, #1, A) < (t+500, #2, B)
//! ```
//!
//! Equal deadlines come out in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use tokio::time::Instant;

/// Identifies one scheduled task. Monotonic per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

struct Entry<T> {
    deadline: Instant,
    id: TaskId,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so BinaryHeap (a max-heap) pops the earliest deadline first.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

pub struct Scheduler<T> {
    queue: BinaryHeap<Entry<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_id: 0,
        }
    }

    /// Queue `task` to become due `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        self.schedule_at(Instant::now() + delay, task)
    }

    pub fn schedule_at(&mut self, deadline: Instant, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Entry { deadline, id, task });
        id
    }

    /// Removes and returns the earliest task whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        if self.queue.peek()?.deadline > now {
            return None;
        }
        self.queue.pop().map(|entry| entry.task)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.peek().map(|entry| entry.deadline)
    }

    /// Waits until the earliest task is due and returns it.
    /// Resolves to `None` right away when the queue is empty.
    pub async fn next(&mut self) -> Option<T> {
        let deadline = self.next_deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.pop_due(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
