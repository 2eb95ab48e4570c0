//! Error types used by the bus, its consumers and event kinds.
//!
//! This module defines three error enums:
//!
//! - [`DispatchError`]: faults surfaced to the caller of [`Bus::dispatch`](crate::Bus::dispatch).
//! - [`ConsumeError`]: failures returned by a consumer's [`Consume::consume`](crate::Consume::consume).
//! - [`KindError`]: malformed or reserved [`EventKind`] paths.
//!
//! All types provide `as_label` for logging, a short stable snake_case label.

use thiserror::Error;

use crate::events::EventKind;

/// # Errors produced while dispatching an event.
///
/// A dispatch pass stops at the first faulting consumer (unless the bus runs with
/// [`FaultPolicy::Isolate`](crate::FaultPolicy::Isolate)); the fault is returned here.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A consumer returned an error from `consume`.
    #[error("consumer {consumer} failed on {kind}: {source}")]
    Consume {
        /// Name of the faulting consumer.
        consumer: &'static str,
        /// Kind of the event being consumed.
        kind: EventKind,
        /// The error returned by the consumer.
        #[source]
        source: ConsumeError,
    },

    /// A consumer panicked while consuming (only caught under `FaultPolicy::Isolate`).
    #[error("consumer {consumer} panicked on {kind}: {info}")]
    ConsumerPanicked {
        /// Name of the panicking consumer.
        consumer: &'static str,
        /// Kind of the event being consumed.
        kind: EventKind,
        /// Panic message, if it was a string.
        info: String,
    },

    /// The event uses a kind reserved for bus-generated notifications but was not
    /// produced by the bus. Nothing was delivered.
    #[error("event kind {kind} is reserved for the bus")]
    ReservedKind {
        /// The rejected kind.
        kind: EventKind,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use relaybus::{ConsumeError, DispatchError, EventKind};
    ///
    /// let err = DispatchError::Consume {
    ///     consumer: "analytics",
    ///     kind: EventKind::new("page_view").unwrap(),
    ///     source: ConsumeError::failed("offline"),
    /// };
    /// assert_eq!(err.as_label(), "dispatch_consume_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Consume { .. } => "dispatch_consume_failed",
            DispatchError::ConsumerPanicked { .. } => "dispatch_consumer_panicked",
            DispatchError::ReservedKind { .. } => "dispatch_reserved_kind",
        }
    }

    /// Name of the consumer that faulted; `None` if the event was refused before delivery.
    pub fn consumer(&self) -> Option<&'static str> {
        match self {
            DispatchError::Consume { consumer, .. }
            | DispatchError::ConsumerPanicked { consumer, .. } => Some(*consumer),
            DispatchError::ReservedKind { .. } => None,
        }
    }

    /// Kind of the event that faulted.
    pub fn kind(&self) -> &EventKind {
        match self {
            DispatchError::Consume { kind, .. }
            | DispatchError::ConsumerPanicked { kind, .. }
            | DispatchError::ReservedKind { kind } => kind,
        }
    }
}

/// # Errors returned by consumers.
///
/// Consumers are only called for events they admitted, so these describe genuine
/// failures to process an event, never "not interested".
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsumeError {
    /// Processing failed (I/O, downstream unavailable, ...).
    #[error("consume failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The event was admitted but its content was unusable (e.g. missing payload).
    #[error("event rejected: {reason}")]
    Rejected {
        /// Why the event could not be used.
        reason: String,
    },
}

impl ConsumeError {
    /// Shorthand for [`ConsumeError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        ConsumeError::Failed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ConsumeError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        ConsumeError::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConsumeError::Failed { .. } => "consume_failed",
            ConsumeError::Rejected { .. } => "consume_rejected",
        }
    }
}

/// # Errors produced when building an [`EventKind`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KindError {
    /// The path was empty.
    #[error("event kind path is empty")]
    Empty,

    /// The path contains an empty segment (`a..b`, leading or trailing dot).
    #[error("event kind {path:?} contains an empty segment")]
    EmptySegment {
        /// The offending path.
        path: String,
    },

    /// A segment contains characters other than ASCII alphanumerics, `_` or `-`.
    #[error("invalid event kind segment {segment:?}")]
    InvalidSegment {
        /// The offending segment.
        segment: String,
    },

    /// The path lives under the root reserved for bus-generated events.
    #[error("event kind {path:?} is reserved for the bus")]
    Reserved {
        /// The offending path.
        path: String,
    },
}

impl KindError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            KindError::Empty => "kind_empty",
            KindError::EmptySegment { .. } => "kind_empty_segment",
            KindError::InvalidSegment { .. } => "kind_invalid_segment",
            KindError::Reserved { .. } => "kind_reserved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_accessors() {
        let kind = EventKind::new("navigation").unwrap();
        let err = DispatchError::ConsumerPanicked {
            consumer: "model",
            kind: kind.clone(),
            info: "boom".into(),
        };
        assert_eq!(err.consumer(), Some("model"));
        assert_eq!(err.kind(), &kind);
        assert_eq!(err.as_label(), "dispatch_consumer_panicked");
        assert_eq!(
            err.to_string(),
            "consumer model panicked on navigation: boom"
        );
    }

    #[test]
    fn test_reserved_kind_has_no_consumer() {
        let err = DispatchError::ReservedKind {
            kind: EventKind::consumed(),
        };
        assert_eq!(err.consumer(), None);
        assert!(err.kind().is_consumed());
        assert_eq!(err.as_label(), "dispatch_reserved_kind");
        assert_eq!(err.to_string(), "event kind bus.consumed is reserved for the bus");
    }

    #[test]
    fn test_consume_error_is_dispatch_source() {
        use std::error::Error as _;

        let err = DispatchError::Consume {
            consumer: "analytics",
            kind: EventKind::new("page_view").unwrap(),
            source: ConsumeError::rejected("no payload"),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("event rejected: no payload"));
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ConsumeError::failed("x").as_label(), "consume_failed");
        assert_eq!(ConsumeError::rejected("x").as_label(), "consume_rejected");
        assert_eq!(KindError::Empty.as_label(), "kind_empty");
        assert_eq!(
            KindError::Reserved { path: "bus".into() }.as_label(),
            "kind_reserved"
        );
    }
}
