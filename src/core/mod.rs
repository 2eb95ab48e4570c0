//! Runtime core: registry, dispatch and notification chaining.
//!
//! The public API from this module is [`Bus`] and its configuration.
//!
//! Internal modules:
//! - [`bus`]: dispatch passes, fault handling and the notification drain loop;
//! - [`registry`]: registration-ordered, non-owning consumer list;
//! - [`pending`]: deferred notification queue and drain/pass bookkeeping;
//! - [`config`]: [`BusConfig`] and [`FaultPolicy`].

mod bus;
mod config;
mod pending;
mod registry;

pub use bus::Bus;
pub use config::{BusConfig, FaultPolicy};
