//! # Non-owning consumer references.
//!
//! The bus never owns consumers. It keeps a [`ConsumerRef`]: a `Weak` handle plus the
//! identity of the consumer's allocation, so two registrations of the same `Arc` are
//! recognised as the same consumer.
//!
//! Identity is stable while any `ConsumerRef` exists: the `Weak` keeps the allocation
//! (not the value) alive, so its address cannot be reused by another consumer.

use std::fmt;
use std::sync::{Arc, Weak};

use super::consumer::Consume;

/// Referential identity of a consumer (address of its shared allocation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(usize);

impl ConsumerId {
    /// Identity of the consumer behind `consumer`.
    #[inline]
    pub fn of<C: ?Sized>(consumer: &Arc<C>) -> Self {
        Self(Arc::as_ptr(consumer) as *const () as usize)
    }
}

/// Non-owning handle to a registered consumer.
#[derive(Clone)]
pub struct ConsumerRef {
    id: ConsumerId,
    name: &'static str,
    handle: Weak<dyn Consume>,
}

impl ConsumerRef {
    pub(crate) fn new(consumer: &Arc<dyn Consume>) -> Self {
        Self {
            id: ConsumerId::of(consumer),
            name: consumer.name(),
            handle: Arc::downgrade(consumer),
        }
    }

    #[inline]
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Name reported by the consumer at registration.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the consumer if the application still holds it.
    #[inline]
    pub fn upgrade(&self) -> Option<Arc<dyn Consume>> {
        self.handle.upgrade()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }

    /// Returns `true` if this handle refers to `consumer`.
    #[inline]
    pub fn is<C: ?Sized>(&self, consumer: &Arc<C>) -> bool {
        self.id == ConsumerId::of(consumer)
    }
}

impl fmt::Debug for ConsumerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerRef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsumeError;
    use crate::events::{Event, Selector};

    struct Noop;

    impl Consume for Noop {
        fn wanted(&self) -> &[Selector] {
            &[]
        }
        fn consume(&self, _: &Event) -> Result<(), ConsumeError> {
            Ok(())
        }
        fn name(&self) -> &'static str {
            "noop"
        }
    }

    #[test]
    fn test_identity_survives_coercion() {
        let concrete = Arc::new(Noop);
        let erased: Arc<dyn Consume> = concrete.clone();

        assert_eq!(ConsumerId::of(&concrete), ConsumerId::of(&erased));
        assert!(ConsumerRef::new(&erased).is(&concrete));
    }

    #[test]
    fn test_distinct_instances_differ() {
        let a = Arc::new(Noop);
        let b = Arc::new(Noop);
        let a_ref = ConsumerRef::new(&(a.clone() as Arc<dyn Consume>));

        assert!(a_ref.is(&a));
        assert!(!a_ref.is(&b));
    }

    #[test]
    fn test_does_not_keep_consumer_alive() {
        let consumer: Arc<dyn Consume> = Arc::new(Noop);
        let handle = ConsumerRef::new(&consumer);

        assert_eq!(handle.name(), "noop");
        assert!(handle.upgrade().is_some());
        drop(consumer);
        assert!(!handle.is_alive());
        assert!(handle.upgrade().is_none());
    }
}
