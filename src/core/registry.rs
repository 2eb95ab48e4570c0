//! # Consumer registry.
//!
//! Ordered list of non-owning consumer handles.
//!
//! ## Rules
//! - At most one entry per [`ConsumerId`]; registering twice is a no-op.
//! - Insertion order is delivery order.
//! - Entries whose consumer was dropped are pruned on the next mutation or snapshot.
//! - The lock is held only to mutate or copy the list, never while consumers run.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::consumers::{Consume, ConsumerId, ConsumerRef};

/// Registration-ordered set of consumers.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Mutex<Vec<ConsumerRef>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `consumer` unless already present. Returns `true` if it was added.
    pub(crate) fn insert(&self, consumer: &Arc<dyn Consume>) -> bool {
        let id = ConsumerId::of(consumer);
        let mut entries = self.lock();
        entries.retain(ConsumerRef::is_alive);

        if entries.iter().any(|e| e.id() == id) {
            return false;
        }
        entries.push(ConsumerRef::new(consumer));
        debug!(consumer = consumer.name(), total = entries.len(), "registered");
        true
    }

    /// Removes every entry with this identity. Returns `true` if any was removed.
    pub(crate) fn remove(&self, id: ConsumerId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.id() != id && e.is_alive());

        let removed = entries.len() < before;
        if removed {
            debug!(?id, total = entries.len(), "deregistered");
        }
        removed
    }

    pub(crate) fn contains(&self, id: ConsumerId) -> bool {
        self.lock().iter().any(|e| e.id() == id && e.is_alive())
    }

    /// Copies the live consumers, in registration order, for one dispatch pass.
    pub(crate) fn snapshot(&self) -> Vec<(ConsumerRef, Arc<dyn Consume>)> {
        let mut entries = self.lock();
        entries.retain(ConsumerRef::is_alive);
        entries
            .iter()
            .filter_map(|e| e.upgrade().map(|c| (e.clone(), c)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().iter().filter(|e| e.is_alive()).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ConsumerRef>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsumeError;
    use crate::events::{Event, Selector};

    struct Named(&'static str);

    impl Consume for Named {
        fn wanted(&self) -> &[Selector] {
            &[]
        }
        fn consume(&self, _: &Event) -> Result<(), ConsumeError> {
            Ok(())
        }
        fn name(&self) -> &'static str {
            self.0
        }
    }

    fn consumer(name: &'static str) -> Arc<dyn Consume> {
        Arc::new(Named(name))
    }

    fn names(reg: &Registry) -> Vec<&'static str> {
        reg.snapshot().iter().map(|(r, _)| r.name()).collect()
    }

    #[test]
    fn test_insert_preserves_order() {
        let reg = Registry::new();
        let (a, b, c) = (consumer("a"), consumer("b"), consumer("c"));

        assert!(reg.insert(&a));
        assert!(reg.insert(&b));
        assert!(reg.insert(&c));
        assert_eq!(names(&reg), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let reg = Registry::new();
        let (a, b) = (consumer("a"), consumer("b"));

        reg.insert(&a);
        reg.insert(&b);
        assert!(!reg.insert(&a));
        assert_eq!(reg.len(), 2);
        assert_eq!(names(&reg), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let reg = Registry::new();
        let a = consumer("a");
        reg.insert(&a);

        assert!(!reg.remove(ConsumerId::of(&consumer("other"))));
        assert_eq!(reg.len(), 1);
        assert!(reg.remove(ConsumerId::of(&a)));
        assert!(!reg.contains(ConsumerId::of(&a)));
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn test_dropped_consumers_are_pruned() {
        let reg = Registry::new();
        let a = consumer("a");
        let b = consumer("b");
        reg.insert(&a);
        reg.insert(&b);

        drop(a);
        assert_eq!(reg.len(), 1);
        assert_eq!(names(&reg), vec!["b"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let reg = Registry::new();
        let a = consumer("a");
        reg.insert(&a);

        let snap = reg.snapshot();
        reg.remove(ConsumerId::of(&a));
        assert_eq!(snap.len(), 1);
        assert_eq!(reg.len(), 0);
    }
}
