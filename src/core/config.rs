//! # Bus configuration.
//!
//! Provides [`BusConfig`], the settings a [`Bus`](crate::Bus) is created with.
//!
//! ## Fault policies
//! ```text
//! FaultPolicy::Propagate  → first failing consumer stops the pass, error returned (default)
//! FaultPolicy::Isolate    → failures and panics are caught per consumer, pass continues,
//!                           first fault still returned once the pass and drain finish
//! ```

/// How a dispatch pass reacts to a consumer fault.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Stop the pass at the first `Err`; panics unwind to the caller of `dispatch` (default).
    #[default]
    Propagate,
    /// Catch errors and panics per consumer, log them and keep delivering.
    Isolate,
}

/// Configuration for a [`Bus`](crate::Bus).
///
/// ## Field semantics
/// - `notify_consumed`: emit a consumed notification after every successful consumption
/// - `fault_policy`: reaction to a failing or panicking consumer
///
/// ## Notes
/// All fields are public; construct with struct update syntax over `default()`.
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Emit `bus.consumed` notifications.
    ///
    /// Disabling it turns the bus into plain fan-out; nothing else changes.
    pub notify_consumed: bool,

    /// Reaction to consumer faults.
    pub fault_policy: FaultPolicy,
}

impl BusConfig {
    #[inline]
    pub fn isolates_faults(&self) -> bool {
        self.fault_policy == FaultPolicy::Isolate
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `notify_consumed = true`
    /// - `fault_policy = FaultPolicy::Propagate`
    fn default() -> Self {
        Self {
            notify_consumed: true,
            fault_policy: FaultPolicy::Propagate,
        }
    }
}
