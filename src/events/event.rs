//! # Events flowing through the bus.
//!
//! An [`Event`] carries an [`EventKind`], an optional type-erased payload and
//! ordering metadata. Events are immutable once built: the builder methods consume
//! `self`, and consumers only ever receive `&Event`.
//!
//! The bus wraps every successful delivery into a **consumed notification**
//! (kind `bus.consumed`) carrying a [`Consumed`] record that references
//! the consumer and the original event. Only the bus can build those.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically
//! in construction order.
//!
//! ## Example
//! ```rust
//! use relaybus::{Event, EventKind};
//!
//! struct PageView { name: &'static str }
//!
//! let ev = Event::new(EventKind::new("page_view").unwrap())
//!     .with_payload(PageView { name: "screen_one" });
//!
//! assert_eq!(ev.kind().as_str(), "page_view");
//! assert_eq!(ev.payload::<PageView>().map(|p| p.name), Some("screen_one"));
//! assert!(ev.payload::<String>().is_none());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use super::kind::EventKind;
use crate::consumers::ConsumerRef;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Shared, immutable, type-erased event payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Unit of data dispatched through the bus.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock construction timestamp
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    kind: EventKind,
    payload: Option<Payload>,
    consumed: Option<Consumed>,
}

impl Event {
    /// Creates a payload-less event of the given kind.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            payload: None,
            consumed: None,
        }
    }

    /// Attaches a payload.
    #[inline]
    pub fn with_payload<T: Any + Send + Sync>(self, payload: T) -> Self {
        self.with_shared_payload(Arc::new(payload))
    }

    /// Attaches an already shared payload without copying it.
    #[inline]
    pub fn with_shared_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Event classification.
    #[inline]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Returns the payload if present and of type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    /// Returns the shared payload handle, if any.
    #[inline]
    pub fn shared_payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    #[inline]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Returns the consumption record if this is a consumed notification.
    #[inline]
    pub fn consumed(&self) -> Option<&Consumed> {
        self.consumed.as_ref()
    }

    #[inline]
    pub fn is_consumed_notification(&self) -> bool {
        self.consumed.is_some()
    }

    /// Builds the notification announcing that `consumer` consumed `event`.
    pub(crate) fn consumed_notification(consumer: ConsumerRef, event: Arc<Event>) -> Self {
        let mut ev = Event::new(EventKind::consumed());
        ev.consumed = Some(Consumed { consumer, event });
        ev
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Event");
        d.field("seq", &self.seq).field("kind", &self.kind);
        if self.payload.is_some() {
            d.field("payload", &format_args!("<payload>"));
        }
        if let Some(consumed) = &self.consumed {
            d.field("consumed", consumed);
        }
        d.finish()
    }
}

/// Record carried by a consumed notification.
#[derive(Clone)]
pub struct Consumed {
    consumer: ConsumerRef,
    event: Arc<Event>,
}

impl Consumed {
    /// The consumer that consumed [`Self::event`].
    #[inline]
    pub fn consumer(&self) -> &ConsumerRef {
        &self.consumer
    }

    /// The original event, shared with every other notification about it.
    #[inline]
    pub fn event(&self) -> &Arc<Event> {
        &self.event
    }
}

impl fmt::Debug for Consumed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumed")
            .field("consumer", &self.consumer.name())
            .field("event", &self.event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct FirstPayload {
        item: bool,
        list: Vec<&'static str>,
    }

    fn kind(path: &str) -> EventKind {
        EventKind::new(path).unwrap()
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(kind("a"));
        let b = Event::new(kind("b"));
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_payload_downcast() {
        let ev = Event::new(kind("first")).with_payload(FirstPayload {
            item: true,
            list: vec!["one", "two"],
        });

        let p = ev.payload::<FirstPayload>().unwrap();
        assert!(p.item);
        assert_eq!(p.list, vec!["one", "two"]);
        assert!(ev.payload::<u32>().is_none());
        assert!(ev.has_payload());
    }

    #[test]
    fn test_clone_shares_payload() {
        let ev = Event::new(kind("first")).with_payload(7u32);
        let cloned = ev.clone();

        let a = ev.shared_payload().unwrap();
        let b = cloned.shared_payload().unwrap();
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(cloned.seq, ev.seq);
    }

    #[test]
    fn test_plain_event_is_not_a_notification() {
        let ev = Event::new(kind("navigation"));
        assert!(!ev.is_consumed_notification());
        assert!(ev.consumed().is_none());
        assert!(!ev.has_payload());
    }

    #[test]
    fn test_debug_hides_payload() {
        let ev = Event::new(kind("secret")).with_payload("token");
        let dbg = format!("{ev:?}");
        assert!(dbg.contains("<payload>"));
        assert!(!dbg.contains("token"));
    }
}
