#![forbid(unsafe_code)]

//! Deterministic delayed one-shot payloads.
//!
//! The host platform's "post this runnable after N milliseconds" facility is
//! modeled as an explicit queue: payloads are scheduled with a delay and
//! drained by advancing a logical clock. Nothing here reads wall time, so a
//! test (or a headless controller) fully controls ordering.
//!
//! # Invariants
//!
//! - Due payloads are delivered ordered by deadline, then by submission
//!   order for equal deadlines.
//! - `advance` delivers every payload whose deadline is `<= now + dt`,
//!   including payloads scheduled with a zero delay.
//! - Cancellation is exact: a cancelled entry is never delivered.

use std::time::Duration;

/// Handle for cancelling a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    deadline: Duration,
    id: TimerId,
    payload: E,
}

/// An ordered queue of delayed one-shot payloads over a logical clock.
///
/// The queue is cheap for the handful of pending actions a card view keeps
/// (touch-feedback dismissal, enabling focus animations, header doze); it is
/// a sorted `Vec`, not a heap.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_id: u64,
    // Sorted by (deadline, id); id order encodes submission order.
    entries: Vec<Entry<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    /// Create an empty queue with its clock at zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Current logical time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deadline of the next pending entry, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Schedule `payload` to be delivered `delay` from now.
    pub fn schedule(&mut self, delay: Duration, payload: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let entry = Entry {
            deadline: self.now + delay,
            id,
            payload,
        };
        let at = self
            .entries
            .partition_point(|e| (e.deadline, e.id.0) <= (entry.deadline, entry.id.0));
        self.entries.insert(at, entry);
        id
    }

    /// Cancel a pending entry. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    /// Drop every pending entry without delivering it.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advance the clock by `dt` and return the payloads that came due, in
    /// delivery order.
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        self.now += dt;
        let due = self.entries.partition_point(|e| e.deadline <= self.now);
        self.entries.drain(..due).map(|e| e.payload).collect()
    }
}
