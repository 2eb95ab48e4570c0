//! # The event bus.
//!
//! [`Bus`] owns the consumer registry and delivers events synchronously on the
//! caller's thread.
//!
//! ## Architecture
//! ```text
//! dispatch(E)
//!   ├─► snapshot registry (registration order)
//!   ├─► for each consumer c:
//!   │      ├─ admission::evaluate(c.wanted(), c.excluded(), E.kind)
//!   │      ├─ refused  → skip
//!   │      └─ admitted → c.consume(&E)
//!   │                     ├─ Ok  → enqueue Consumed{c, E}   (unless E is itself a notification)
//!   │                     └─ Err → stop the pass (FaultPolicy::Propagate)
//!   └─► outermost call drains the queue: each notification runs its own pass
//! ```
//!
//! ## Rules
//! - **Synchronous**: `consume` runs to completion before the next consumer is visited.
//! - **Snapshot iteration**: `register` / `deregister` from inside `consume` take effect
//!   on the next pass, never on the one in progress.
//! - **Reentrancy**: `consume` may call `dispatch`; the nested pass runs immediately,
//!   its notifications join the queue drained by the outermost call.
//! - **Notification order**: for matched consumers A, B: `A(E)`, `B(E)`, `N(A,E)`, `N(B,E)`.
//! - **No notification chains of notifications**: consuming a notification emits nothing.
//! - **Faults**: a failed pass still drains the notifications queued before the failure;
//!   the first fault is returned, later ones are logged. A panic is resumed only after
//!   that drain, so no notification is left behind.
//! - **Reserved kinds**: only the bus produces `bus.*` events; forged ones are refused.
//!
//! ## Concurrency
//! `Bus` is `Clone + Send + Sync`. When several threads dispatch at once, the last pass
//! to finish drains the shared queue, so a `dispatch` may return before its own
//! notifications have been delivered by another thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::config::BusConfig;
use super::pending::Pending;
use super::registry::Registry;
use crate::admission;
use crate::consumers::{Consume, ConsumerId};
use crate::error::DispatchError;
use crate::events::Event;

struct Inner {
    registry: Registry,
    pending: Pending,
    config: BusConfig,
}

/// Synchronous in-process event bus.
///
/// ### Properties
/// - **Non-owning**: holds `Weak` handles; dropping a consumer unregisters it.
/// - **Idempotent registration**: one entry per consumer identity.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`); clones share one registry.
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use relaybus::{Bus, Consume, ConsumeError, Event, EventKind, Selector};
///
/// struct Recorder {
///     wanted: Vec<Selector>,
///     seen: Mutex<Vec<String>>,
/// }
///
/// impl Consume for Recorder {
///     fn wanted(&self) -> &[Selector] { &self.wanted }
///     fn consume(&self, ev: &Event) -> Result<(), ConsumeError> {
///         self.seen.lock().unwrap().push(ev.kind().to_string());
///         Ok(())
///     }
/// }
///
/// let bus = Bus::new();
/// let rec = Arc::new(Recorder {
///     wanted: vec![Selector::kind("navigation").unwrap(), Selector::consumed()],
///     seen: Mutex::new(Vec::new()),
/// });
/// bus.register(&rec);
///
/// bus.dispatch(Event::new(EventKind::new("navigation").unwrap())).unwrap();
/// assert_eq!(*rec.seen.lock().unwrap(), vec!["navigation", "bus.consumed"]);
/// ```
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Bus {
    /// Creates a bus with [`BusConfig::default`].
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                pending: Pending::new(),
                config,
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }

    /// Registers `consumer`; no-op if it is already registered.
    pub fn register<C: Consume>(&self, consumer: &Arc<C>) {
        let erased: Arc<dyn Consume> = consumer.clone();
        self.register_dyn(&erased);
    }

    /// Registers an already type-erased consumer; no-op if it is already registered.
    pub fn register_dyn(&self, consumer: &Arc<dyn Consume>) {
        self.inner.registry.insert(consumer);
    }

    /// Removes `consumer`; no-op if it was never registered.
    pub fn deregister<C: Consume + ?Sized>(&self, consumer: &Arc<C>) {
        self.inner.registry.remove(ConsumerId::of(consumer));
    }

    pub fn is_registered<C: Consume + ?Sized>(&self, consumer: &Arc<C>) -> bool {
        self.inner.registry.contains(ConsumerId::of(consumer))
    }

    /// Number of live registered consumers.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifications queued but not yet delivered.
    ///
    /// Non-zero only while a dispatch is in progress.
    pub fn pending_notifications(&self) -> usize {
        self.inner.pending.len()
    }

    /// Delivers `event` to every admitting consumer, then drains queued notifications.
    ///
    /// ### Errors
    /// Returns the first consumer fault. Under [`FaultPolicy::Propagate`](crate::FaultPolicy)
    /// the pass stops at that consumer; notifications queued before it are still delivered.
    /// Returns [`DispatchError::ReservedKind`] without delivering anything if the event uses
    /// a `bus.*` kind but was not produced by the bus.
    ///
    /// ### Panics
    /// A panicking consumer (under `Propagate`) unwinds to the caller unchanged, after the
    /// notifications queued before it have been delivered.
    pub fn dispatch(&self, event: Event) -> Result<(), DispatchError> {
        if event.kind().is_reserved() && !event.is_consumed_notification() {
            warn!(seq = event.seq, kind = %event.kind(), "refusing event with reserved kind");
            return Err(DispatchError::ReservedKind {
                kind: event.kind().clone(),
            });
        }

        let event = Arc::new(event);
        debug!(seq = event.seq, kind = %event.kind(), "dispatch");

        let pass = self.inner.pending.enter();
        let delivered = panic::catch_unwind(AssertUnwindSafe(|| self.deliver(&event)));
        let last = pass.leave();

        let delivered = match delivered {
            Ok(delivered) => delivered,
            Err(panic_err) => {
                if last {
                    self.drain_while_unwinding();
                }
                panic::resume_unwind(panic_err);
            }
        };
        if !last {
            return delivered;
        }

        match (delivered, self.drain()) {
            (Err(err), Err(later)) => {
                warn!(error = %later, label = later.as_label(), "notification fault suppressed");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), drained) => drained,
        }
    }

    /// One pass over the registry snapshot.
    fn deliver(&self, event: &Arc<Event>) -> Result<(), DispatchError> {
        let notify = self.inner.config.notify_consumed && !event.is_consumed_notification();
        let mut first_fault = None;

        for (handle, consumer) in self.inner.registry.snapshot() {
            let verdict = admission::evaluate(consumer.wanted(), consumer.excluded(), event.kind());
            trace!(
                consumer = handle.name(),
                seq = event.seq,
                verdict = verdict.as_label(),
                "admission"
            );
            if !verdict.admits() {
                continue;
            }

            match self.consume_one(consumer.as_ref(), event) {
                Ok(()) if notify => {
                    self.inner
                        .pending
                        .push(Event::consumed_notification(handle, Arc::clone(event)));
                }
                Ok(()) => {}
                Err(err) if self.inner.config.isolates_faults() => {
                    warn!(
                        consumer = err.consumer(),
                        kind = %err.kind(),
                        label = err.as_label(),
                        error = %err,
                        "consumer fault isolated"
                    );
                    if first_fault.is_none() {
                        first_fault = Some(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }

        first_fault.map_or(Ok(()), Err)
    }

    fn consume_one(&self, consumer: &dyn Consume, event: &Event) -> Result<(), DispatchError> {
        let outcome = if self.inner.config.isolates_faults() {
            match panic::catch_unwind(AssertUnwindSafe(|| consumer.consume(event))) {
                Ok(outcome) => outcome,
                Err(panic_err) => {
                    return Err(DispatchError::ConsumerPanicked {
                        consumer: consumer.name(),
                        kind: event.kind().clone(),
                        info: panic_message(panic_err.as_ref()),
                    });
                }
            }
        } else {
            consumer.consume(event)
        };

        outcome.map_err(|source| DispatchError::Consume {
            consumer: consumer.name(),
            kind: event.kind().clone(),
            source,
        })
    }

    /// Delivers queued notifications until the queue is observed empty.
    ///
    /// A panicking notification consumer does not strand the rest of the queue: the
    /// drain continues and the first panic is resumed once the queue is empty.
    fn drain(&self) -> Result<(), DispatchError> {
        let mut first_fault: Option<DispatchError> = None;
        let mut first_panic = None;

        loop {
            let Some(guard) = self.inner.pending.begin_drain() else {
                break;
            };
            while let Some(notification) = self.inner.pending.pop() {
                let notification = Arc::new(notification);
                let pass = self.inner.pending.enter();
                let result = panic::catch_unwind(AssertUnwindSafe(|| self.deliver(&notification)));
                drop(pass);

                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) if first_fault.is_some() => {
                        warn!(error = %err, label = err.as_label(), "notification fault suppressed");
                    }
                    Ok(Err(err)) => first_fault = Some(err),
                    Err(panic_err) if first_panic.is_some() => {
                        warn!(
                            seq = notification.seq,
                            info = %panic_message(panic_err.as_ref()),
                            "notification consumer panic suppressed"
                        );
                    }
                    Err(panic_err) => first_panic = Some(panic_err),
                }
            }
            drop(guard);

            if self.inner.pending.is_empty() {
                break;
            }
        }

        if let Some(panic_err) = first_panic {
            panic::resume_unwind(panic_err);
        }
        first_fault.map_or(Ok(()), Err)
    }

    /// Drains after a consumer panicked; the caller resumes the original panic.
    fn drain_while_unwinding(&self) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.drain())) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, label = err.as_label(), "notification fault suppressed");
            }
            Err(panic_err) => {
                warn!(
                    info = %panic_message(panic_err.as_ref()),
                    "notification consumer panic suppressed"
                );
            }
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("consumers", &self.len())
            .field("pending", &self.pending_notifications())
            .field("config", &self.inner.config)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
