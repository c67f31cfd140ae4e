//! Cancellable deferred events.
//!
//! A [`TimerQueue`] holds events keyed by deadline. The owner polls it with
//! the current time and handles whatever is due; nothing fires on its own.
//! Every scheduled event gets a [`TimerId`] so it can be cancelled when the
//! state that scheduled it is left.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::collections::BTreeMap;
use core::time::Duration;

/// Handle to a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Deadline-ordered queue of pending events.
///
/// Events with equal deadlines come out in scheduling order.
///
/// # Example
///
/// ```rust
/// use core::time::Duration;
/// use tranquil_core::TimerQueue;
///
/// let mut timers = TimerQueue::new();
/// let late = timers.schedule(Duration::from_secs(8), "fade-out done");
/// timers.schedule(Duration::from_secs(2), "start layer");
///
/// assert!(timers.cancel(late));
/// assert_eq!(timers.pop_due(Duration::from_secs(10)).map(|(_, e)| e), Some("start layer"));
/// assert!(timers.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    entries: BTreeMap<(Duration, TimerId), E>,
    next_id: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((deadline, id), event);
        id
    }

    /// Cancel one event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.entries.keys().find(|(_, k)| *k == id).copied();
        key.is_some_and(|key| self.entries.remove(&key).is_some())
    }

    /// Cancel every event matching `pred`, returning how many were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, event| !pred(event));
        before - self.entries.len()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the earliest event whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, E)> {
        let (&(deadline, _), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.entries.pop_first().map(|((_, id), event)| (id, event))
    }

    /// Deadline of the earliest pending event.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Whether `id` is still pending.
    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.keys().any(|(_, k)| *k == id)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn due_events_come_out_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(secs(3), 'c');
        timers.schedule(secs(1), 'a');
        timers.schedule(secs(2), 'b');

        assert!(timers.pop_due(secs(0)).is_none());

        let fired: Vec<char> = core::iter::from_fn(|| timers.pop_due(secs(2)))
            .map(|(_, e)| e)
            .collect();
        assert_eq!(fired, vec!['a', 'b']);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(secs(3)));
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut timers = TimerQueue::new();
        for n in 0..5 {
            timers.schedule(secs(1), n);
        }
        let fired: Vec<i32> = core::iter::from_fn(|| timers.pop_due(secs(1)))
            .map(|(_, e)| e)
            .collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancelled_events_never_fire() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(secs(1), "dispose");
        assert!(timers.contains(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id), "second cancel is a no-op");
        assert!(!timers.contains(id));
        assert!(timers.pop_due(secs(100)).is_none());
    }

    #[test]
    fn cancel_where_filters_by_event() {
        let mut timers = TimerQueue::new();
        timers.schedule(secs(1), 1);
        timers.schedule(secs(2), 2);
        timers.schedule(secs(3), 3);

        assert_eq!(timers.cancel_where(|e| e % 2 == 1), 2);
        assert_eq!(timers.pop_due(secs(5)).map(|(_, e)| e), Some(2));

        timers.schedule(secs(9), 9);
        timers.clear();
        assert!(timers.is_empty());
    }
}
