//! Deferred one-shot timers.
//!
//! A [`TimerQueue`] holds payloads that become due at a given instant. The
//! queue never reads the clock itself: callers pass `now` in, so the owner
//! decides what time it is (a real clock in production, a manual one in
//! tests).
//!
//! Cancel-and-replace (debouncing) is built by stopping the previous
//! [`TimerId`] and starting a new timer; stopping a timer that already fired
//! reports [`TimerError::InvalidTimerId`] and is otherwise harmless.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
struct TimerData<T> {
    /// When this timer fires.
    fire_at: Instant,
    /// Work handed back when the timer fires.
    payload: T,
}

/// An entry in the timer queue (min-heap by fire time, then start order).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_at: Instant,
    seq: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A queue of pending one-shot timers carrying payloads of type `T`.
pub struct TimerQueue<T> {
    /// All pending timers.
    timers: SlotMap<TimerId, TimerData<T>>,
    /// Priority queue of pending fires. May hold entries for stopped timers.
    queue: BinaryHeap<TimerQueueEntry>,
    /// Start counter, so timers due at the same instant fire in start order.
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    /// Create an empty timer queue.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Start a one-shot timer that fires `delay` after `now`.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_one_shot(&mut self, now: Instant, delay: Duration, payload: T) -> TimerId {
        let fire_at = now + delay;
        let id = self.timers.insert(TimerData { fire_at, payload });

        self.queue.push(TimerQueueEntry {
            id,
            fire_at,
            seq: self.next_seq,
        });
        self.next_seq += 1;

        tracing::trace!(target: "horizon_select_core::timer", ?id, ?delay, "timer started");
        id
    }

    /// Stop a timer, handing back its payload.
    pub fn stop(&mut self, id: TimerId) -> Result<T> {
        let data = self.timers.remove(id).ok_or(TimerError::InvalidTimerId)?;
        tracing::trace!(target: "horizon_select_core::timer", ?id, "timer stopped");
        Ok(data.payload)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stopped();
        self.queue
            .peek()
            .map(|entry| entry.fire_at.saturating_duration_since(now))
    }

    /// Remove and return every timer due at or before `now`, in fire order.
    #[tracing::instrument(skip(self), target = "horizon_select_core::timer", level = "trace")]
    pub fn take_expired(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_at > now {
                break;
            }
            let id = entry.id;
            self.queue.pop();

            // Stopped timers leave their queue entry behind.
            let Some(data) = self.timers.remove(id) else {
                continue;
            };

            tracing::trace!(target: "horizon_select_core::timer", ?id, "timer fired");
            fired.push((id, data.payload));
        }

        fired
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("active", &self.timers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.start_one_shot(start, ms(10), 7);

        assert!(timers.take_expired(start + ms(9)).is_empty());

        let fired = timers.take_expired(start + ms(10));
        assert_eq!(fired, vec![(id, 7)]);
        assert_eq!(timers.stop(id), Err(TimerError::InvalidTimerId));
        assert!(timers.take_expired(start + ms(100)).is_empty());
    }

    #[test]
    fn test_fire_order_follows_deadline_then_start_order() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.start_one_shot(start, ms(50), "late");
        timers.start_one_shot(start, ms(10), "first");
        timers.start_one_shot(start, ms(10), "second");

        let fired: Vec<_> = timers
            .take_expired(start + ms(60))
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(fired, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_stop_returns_payload_and_prevents_fire() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.start_one_shot(start, ms(10), "search");

        assert_eq!(timers.stop(id), Ok("search"));
        assert_eq!(timers.stop(id), Err(TimerError::InvalidTimerId));
        assert!(timers.take_expired(start + ms(20)).is_empty());
        assert_eq!(timers.time_until_next(start), None);
    }

    #[test]
    fn test_cancel_and_replace() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();

        let first = timers.start_one_shot(start, ms(500), "ab");
        timers.stop(first).unwrap();
        let second = timers.start_one_shot(start + ms(200), ms(500), "abc");

        assert!(timers.take_expired(start + ms(500)).is_empty());
        let fired = timers.take_expired(start + ms(700));
        assert_eq!(fired, vec![(second, "abc")]);
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        assert_eq!(timers.time_until_next(start), None);

        let early = timers.start_one_shot(start, ms(10), ());
        timers.start_one_shot(start, ms(50), ());
        assert_eq!(timers.time_until_next(start), Some(ms(10)));

        timers.stop(early).unwrap();
        assert_eq!(timers.time_until_next(start), Some(ms(50)));
        assert_eq!(timers.time_until_next(start + ms(80)), Some(Duration::ZERO));
    }

    #[test]
    fn test_clear() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.start_one_shot(start, ms(1), ());
        timers.start_one_shot(start, ms(2), ());

        timers.clear();
        assert_eq!(timers.time_until_next(start), None);
        assert!(timers.take_expired(start + ms(10)).is_empty());
    }
}
