//! Last-request-wins bookkeeping.
//!
//! Each `(user, task kind)` pair remembers only its newest ticket. A call whose ticket
//! has been superseded by the time it finishes must have its result discarded.
//! Superseded calls are not aborted; they simply run to completion unobserved.
//! Dropping a ticket releases its key if no newer request has taken it, so callers
//! hold the ticket until their result is persisted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::TaskKind;

type Key = (String, TaskKind);

#[derive(Default)]
struct Inner {
    next_generation: AtomicU64,
    latest: Mutex<HashMap<Key, u64>>,
}

#[derive(Clone, Default)]
pub struct RequestTracker {
    inner: Arc<Inner>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn latest(&self) -> MutexGuard<'_, HashMap<Key, u64>> {
        // A poisoned map only ever holds generation numbers; keep using it.
        self.inner
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new request, superseding any in-flight request for the same key.
    pub fn begin(&self, user_id: &str, kind: TaskKind) -> RequestTicket {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let key = (user_id.to_string(), kind);
        self.latest().insert(key.clone(), generation);
        RequestTicket {
            tracker: self.clone(),
            key,
            generation,
        }
    }

    /// Number of keys with a request still registered.
    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.latest().len()
    }
}

pub struct RequestTicket {
    tracker: RequestTracker,
    key: Key,
    generation: u64,
}

impl RequestTicket {
    pub fn user_id(&self) -> &str {
        &self.key.0
    }

    /// True while no newer request for the same key has begun.
    pub fn is_current(&self) -> bool {
        self.tracker.latest().get(&self.key) == Some(&self.generation)
    }
}

impl Drop for RequestTicket {
    fn drop(&mut self) {
        let mut latest = self.tracker.latest();
        if latest.get(&self.key) == Some(&self.generation) {
            latest.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request_is_current_and_released_on_drop() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin("u1", TaskKind::JobMatch);
        assert!(ticket.is_current());
        assert_eq!(tracker.in_flight(), 1);
        drop(ticket);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_newer_request_supersedes_older() {
        let tracker = RequestTracker::new();
        let first = tracker.begin("u1", TaskKind::CareerTwin);
        let second = tracker.begin("u1", TaskKind::CareerTwin);

        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_dropping_stale_ticket_keeps_newer_registered() {
        let tracker = RequestTracker::new();
        let stale = tracker.begin("u1", TaskKind::Trajectory);
        let newer = tracker.begin("u1", TaskKind::Trajectory);

        drop(stale);
        assert_eq!(tracker.in_flight(), 1);
        assert!(newer.is_current());
        drop(newer);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_abandoned_tickets_do_not_accumulate() {
        let tracker = RequestTracker::new();
        for user in ["u1", "u2", "u3"] {
            // e.g. the handler future was cancelled before persisting
            let _ticket = tracker.begin(user, TaskKind::Simulation);
        }
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_stale_ticket_stays_stale_after_key_is_reused() {
        let tracker = RequestTracker::new();
        let stale = tracker.begin("u1", TaskKind::Roadmap);
        drop(tracker.begin("u1", TaskKind::Roadmap));

        let latest = tracker.begin("u1", TaskKind::Roadmap);
        assert!(!stale.is_current());
        assert!(latest.is_current());
    }

    #[test]
    fn test_keys_are_independent() {
        let tracker = RequestTracker::new();
        let twin = tracker.begin("u1", TaskKind::CareerTwin);
        let jobs = tracker.begin("u1", TaskKind::JobMatch);
        let other_user = tracker.begin("u2", TaskKind::CareerTwin);

        assert!(twin.is_current());
        assert!(jobs.is_current());
        assert!(other_user.is_current());
        assert_eq!(tracker.in_flight(), 3);
    }
}
