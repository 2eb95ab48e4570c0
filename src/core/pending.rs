//! # Deferred consumed-notification queue.
//!
//! Notifications produced during a dispatch pass are appended here and delivered
//! after the pass, by whichever `dispatch` call holds the drain flag.
//!
//! ## Internal scheme
//! ```text
//! dispatch(E) ─► enter() ─► pass over registry ─► push N(c1,E), N(c2,E) ...
//!            └─► leave()
//!                  ├─ other passes still running → return (the last one out drains)
//!                  └─ last pass out ─► begin_drain()
//!                        ├─ None    → someone is already draining; return
//!                        └─ Some(g) → pop/deliver until empty, drop g,
//!                                     re-check: items pushed after the last pop are picked up
//! ```
//!
//! Nested `dispatch` calls made from inside a consumer only enqueue, so the stack
//! never grows with the length of the notification chain.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::events::Event;

/// FIFO of notifications awaiting delivery.
#[derive(Default)]
pub(crate) struct Pending {
    queue: Mutex<VecDeque<Event>>,
    passes: AtomicUsize,
    draining: AtomicBool,
}

impl Pending {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, ev: Event) {
        self.lock().push_back(ev);
    }

    pub(crate) fn pop(&self) -> Option<Event> {
        self.lock().pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Marks the start of a dispatch pass.
    pub(crate) fn enter(&self) -> PassGuard<'_> {
        self.passes.fetch_add(1, Ordering::AcqRel);
        PassGuard {
            passes: &self.passes,
        }
    }

    /// Claims the drain flag; `None` if someone already holds it.
    ///
    /// The flag is released when the guard drops, including during unwinding.
    pub(crate) fn begin_drain(&self) -> Option<DrainGuard<'_>> {
        self.draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard { flag: &self.draining })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An in-progress dispatch pass; decrements the pass count when dropped.
pub(crate) struct PassGuard<'a> {
    passes: &'a AtomicUsize,
}

impl PassGuard<'_> {
    /// Ends the pass. Returns `true` if no other pass is still running.
    pub(crate) fn leave(self) -> bool {
        let last = self.passes.fetch_sub(1, Ordering::AcqRel) == 1;
        std::mem::forget(self);
        last
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.passes.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Exclusive right to drain a [`Pending`] queue.
pub(crate) struct DrainGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    fn event(path: &str) -> Event {
        Event::new(EventKind::new(path).unwrap())
    }

    #[test]
    fn test_fifo_order() {
        let pending = Pending::new();
        pending.push(event("a"));
        pending.push(event("b"));

        assert_eq!(pending.len(), 2);
        assert_eq!(pending.pop().map(|e| e.kind().to_string()).as_deref(), Some("a"));
        assert_eq!(pending.pop().map(|e| e.kind().to_string()).as_deref(), Some("b"));
        assert!(pending.pop().is_none());
        assert!(pending.is_empty());
    }

    #[test]
    fn test_drain_flag_is_exclusive() {
        let pending = Pending::new();

        let guard = pending.begin_drain();
        assert!(guard.is_some());
        assert!(pending.begin_drain().is_none());

        drop(guard);
        assert!(pending.begin_drain().is_some());
    }

    #[test]
    fn test_only_last_pass_reports_last() {
        let pending = Pending::new();

        let outer = pending.enter();
        let nested = pending.enter();
        assert!(!nested.leave());
        assert!(outer.leave());

        // an unwound pass still decrements
        drop(pending.enter());
        assert!(pending.enter().leave());
    }

    #[test]
    fn test_drain_flag_released_on_panic() {
        let pending = Pending::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = pending.begin_drain();
            panic!("consumer blew up");
        }));

        assert!(result.is_err());
        assert!(pending.begin_drain().is_some());
    }
}
