//! # Event consumer trait.
//!
//! Provides [`Consume`], the extension point for plugging event handlers into the bus.
//!
//! Each consumer declares:
//! - **`wanted`**: selectors for the kinds it expects to consume;
//! - **`excluded`**: selectors it refuses even when wanted (default: empty);
//! - **`consume`**: the handler, called synchronously on the dispatching thread.
//!
//! ## Rules
//! - `consume` is only called for events admitted by the
//!   [admission rules](crate::admission::evaluate); it should never fail merely
//!   because the event is uninteresting.
//! - Lists are read on every dispatch, so a consumer may change its interest over time.
//! - `consume` may call back into the bus (`dispatch`, `register`, `deregister`).
//!
//! ## Example
//! ```rust
//! use relaybus::{Consume, ConsumeError, Event, Selector};
//!
//! struct Analytics {
//!     wanted: Vec<Selector>,
//! }
//!
//! impl Consume for Analytics {
//!     fn wanted(&self) -> &[Selector] { &self.wanted }
//!
//!     fn consume(&self, ev: &Event) -> Result<(), ConsumeError> {
//!         // ship a page-view hit...
//!         let _ = ev;
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "analytics" }
//! }
//! ```

use crate::error::ConsumeError;
use crate::events::{Event, Selector};

/// Participant registered on a [`Bus`](crate::Bus).
///
/// ### Implementation requirements
/// - Keep `consume` fast; it runs inline with the producer's `dispatch` call.
/// - Return `Err` only for genuine failures; the error aborts the current pass.
pub trait Consume: Send + Sync + 'static {
    /// Kinds this consumer expects to consume.
    ///
    /// May contain [`Selector::All`] (everything) or [`Selector::None`] (nothing).
    fn wanted(&self) -> &[Selector];

    /// Kinds this consumer refuses regardless of [`Self::wanted`].
    ///
    /// [`Selector::None`] here is an override: the consumer receives every event.
    fn excluded(&self) -> &[Selector] {
        &[]
    }

    /// Consumes a single admitted event.
    fn consume(&self, event: &Event) -> Result<(), ConsumeError>;

    /// Returns the consumer name used in logs and errors.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
