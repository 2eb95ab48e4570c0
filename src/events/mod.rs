//! Events: data model and kind hierarchy.
//!
//! This module groups the event **data model** dispatched through the
//! [`Bus`](crate::Bus) and the **selectors** consumers use to declare interest.
//!
//! ## Contents
//! - [`Event`], [`Payload`], [`Consumed`] the dispatched unit and its notification record
//! - [`EventKind`], [`Selector`] hierarchical classification and list entries
//!
//! ## Quick reference
//! - **Producers**: application code calling `Bus::dispatch`, and the bus itself
//!   (consumed notifications).
//! - **Consumers**: anything implementing [`Consume`](crate::Consume).

mod event;
mod kind;

pub use event::{Consumed, Event, Payload};
pub use kind::{EventKind, Selector};
