//! # relaybus
//!
//! **relaybus** is a synchronous, in-process publish/subscribe dispatcher.
//!
//! Producers dispatch typed [`Event`]s through a central [`Bus`]. Consumers register
//! with the bus and declare which event kinds they want and which they refuse; the bus
//! decides per (consumer, event) pair whether delivery happens, and announces every
//! successful delivery as a new *consumed notification* on the same bus.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   producer   │   │   producer   │   │   consumer   │
//!     │ (navigation) │   │ (page views) │   │ (reentrant)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus::dispatch(Event)                                             │
//! │  - Registry (ordered, non-owning, one entry per consumer)         │
//! │  - admission::evaluate (wanted / excluded precedence rules)       │
//! │  - Pending (FIFO of consumed notifications)                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   consumer1.consume  consumer2.consume  consumerN.consume     (registration order)
//!        │ Ok               │ Ok               │ Ok
//!        └──────────────────┴──────────────────┴──► Consumed{consumer, event}
//!                                                        │
//!                                    drained after the pass, each one dispatched
//!                                    through the same admission rules
//! ```
//!
//! ### Admission
//! ```text
//! 1. excluded ∋ None       → deliver
//! 2. wanted   ∋ None       → skip
//! 3. wanted   ∋ All        → deliver
//! 4. excluded ∋ All        → skip
//! 5. excluded matches kind → skip
//! 6. wanted misses kind    → skip
//! 7. otherwise             → deliver
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                       |
//! |-------------------|-------------------------------------------------------------|------------------------------------------|
//! | **Bus**           | Register, deregister, dispatch; notification chaining.      | [`Bus`]                                  |
//! | **Consumers**     | Declare interest and consume events.                        | [`Consume`], [`ConsumerRef`]             |
//! | **Events**        | Hierarchical kinds, typed payloads, consumed notifications. | [`Event`], [`EventKind`], [`Selector`]   |
//! | **Admission**     | The precedence rules, inspectable.                          | [`admission::evaluate`], [`Verdict`]     |
//! | **Errors**        | Typed errors for dispatch, consumers and kinds.             | [`DispatchError`], [`ConsumeError`]      |
//! | **Configuration** | Notifications on/off, fault isolation.                      | [`BusConfig`], [`FaultPolicy`]           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] consumer that traces every event.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use relaybus::{Bus, Consume, ConsumeError, Event, EventKind, Selector};
//!
//! struct PageView { name: &'static str }
//!
//! struct Analytics {
//!     wanted: Vec<Selector>,
//!     hits: Mutex<Vec<&'static str>>,
//! }
//!
//! impl Consume for Analytics {
//!     fn wanted(&self) -> &[Selector] { &self.wanted }
//!
//!     fn consume(&self, ev: &Event) -> Result<(), ConsumeError> {
//!         let pv = ev
//!             .payload::<PageView>()
//!             .ok_or_else(|| ConsumeError::rejected("page view without payload"))?;
//!         self.hits.lock().unwrap().push(pv.name);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "analytics" }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::new();
//!     let analytics = Arc::new(Analytics {
//!         wanted: vec![Selector::kind("page_view")?],
//!         hits: Mutex::new(Vec::new()),
//!     });
//!     bus.register(&analytics);
//!
//!     // a more specific page view still reaches a `page_view` consumer
//!     let reward = EventKind::new("page_view")?.child("user_reward")?;
//!     bus.dispatch(Event::new(reward).with_payload(PageView { name: "reward" }))?;
//!
//!     assert_eq!(*analytics.hits.lock().unwrap(), vec!["reward"]);
//!     Ok(())
//! }
//! ```

pub mod admission;
mod consumers;
mod core;
mod error;
mod events;

// ---- Public re-exports ----

pub use admission::Verdict;
pub use consumers::{Consume, ConsumerId, ConsumerRef};
pub use crate::core::{Bus, BusConfig, FaultPolicy};
pub use error::{ConsumeError, DispatchError, KindError};
pub use events::{Consumed, Event, EventKind, Payload, Selector};

// Optional: expose a simple built-in logger consumer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use consumers::LogWriter;
