//! # Event consumers for the relaybus runtime.
//!
//! This module provides the [`Consume`] trait, the non-owning [`ConsumerRef`] the bus
//! keeps for each registration, and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   producer ── dispatch(Event) ──► Bus ──► admission::evaluate(wanted, excluded, kind)
//!                                              │
//!                                              ├── admitted ──► Consume::consume(&Event)
//!                                              │                     │ Ok
//!                                              │                     ▼
//!                                              │             pending queue ◄── Consumed{consumer, event}
//!                                              │
//!                                              └── refused ──► skipped (trace)
//! ```
//!
//! ## Consumer types
//! - **Passive consumers** - observe and react to events (logging, analytics)
//! - **Reactive consumers** - dispatch follow-up events from `consume` (models, flow controllers)

mod consumer;
mod handle;
#[cfg(any(test, feature = "logging"))]
mod log;

pub use consumer::Consume;
pub use handle::{ConsumerId, ConsumerRef};
#[cfg(any(test, feature = "logging"))]
pub use log::LogWriter;
