//! # LogWriter: event tracer
//!
//! A minimal consumer that wants every event and records it through `tracing`:
//! ordinary events at `debug`, consumed notifications at `info`.
//! Use it for development or demos; install a `tracing` subscriber to see output.
//!
//! ## Example output
//! ```text
//! DEBUG relaybus::consumers::log: event seq=3 kind=navigation payload=true
//! INFO  relaybus::consumers::log: consumed consumer="flow" seq=3 kind=navigation
//! ```

use tracing::{debug, info};

use crate::consumers::Consume;
use crate::error::ConsumeError;
use crate::events::{Event, Selector};

static WANTED: [Selector; 1] = [Selector::All];

/// Event writer consumer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Consume for LogWriter {
    fn wanted(&self) -> &[Selector] {
        &WANTED
    }

    fn consume(&self, e: &Event) -> Result<(), ConsumeError> {
        match e.consumed() {
            Some(c) => {
                info!(
                    consumer = c.consumer().name(),
                    seq = c.event().seq,
                    kind = %c.event().kind(),
                    "consumed"
                );
            }
            None => {
                debug!(seq = e.seq, kind = %e.kind(), payload = e.has_payload(), "event");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
