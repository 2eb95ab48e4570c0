//! # Example: page_views
//!
//! A small screen-flow application wired through one [`Bus`].
//!
//! Shows how to:
//! - Model an event hierarchy (`page_view` / `page_view.user_reward`).
//! - Attach typed payloads and read them back in consumers.
//! - Dispatch reentrantly from inside `consume` (the reward model).
//! - Observe every delivery through consumed notifications ([`LogWriter`]).
//!
//! ## Flow
//! ```text
//! main ──► navigation(screen_one)
//!            └─► Flow ──► page_view(screen_one)          ──► Analytics
//! main ──► navigation(reward)
//!            └─► Flow ──► page_view.user_reward(reward)  ──► Analytics, Model
//!                                                              └─► reward.qualified ──► Flow
//! main ──► reward.claim ──► Model ──► reward.claimed ──► Flow
//! LogWriter sees everything, including bus.consumed notifications
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example page_views --features logging
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use relaybus::{Bus, Consume, ConsumeError, Event, EventKind, KindError, LogWriter, Selector};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy)]
enum Destination {
    ScreenOne,
    Reward,
}

#[derive(Debug)]
struct PageView {
    name: &'static str,
    at: SystemTime,
}

/// Kinds used by the demo application.
struct Kinds {
    navigation: EventKind,
    page_view: EventKind,
    reward_page_view: EventKind,
    qualified: EventKind,
    claim: EventKind,
    claimed: EventKind,
}

impl Kinds {
    fn new() -> Result<Self, KindError> {
        let page_view = EventKind::new("page_view")?;
        let reward = EventKind::new("reward")?;
        Ok(Self {
            navigation: EventKind::new("navigation")?,
            reward_page_view: page_view.child("user_reward")?,
            page_view,
            qualified: reward.child("qualified")?,
            claim: reward.child("claim")?,
            claimed: reward.child("claimed")?,
        })
    }
}

/// Routes navigation requests to screens; screens report page views.
struct Flow {
    bus: Bus,
    kinds: Arc<Kinds>,
    wanted: Vec<Selector>,
}

impl Consume for Flow {
    fn wanted(&self) -> &[Selector] {
        &self.wanted
    }

    fn consume(&self, ev: &Event) -> Result<(), ConsumeError> {
        let kinds = &self.kinds;
        if ev.kind() == &kinds.navigation {
            let dest = ev
                .payload::<Destination>()
                .ok_or_else(|| ConsumeError::rejected("navigation without destination"))?;
            let (kind, name) = match dest {
                Destination::ScreenOne => (kinds.page_view.clone(), "screen_one"),
                Destination::Reward => (kinds.reward_page_view.clone(), "reward"),
            };
            info!(screen = name, "showing screen");
            let page_view = PageView {
                name,
                at: SystemTime::now(),
            };
            return self
                .bus
                .dispatch(Event::new(kind).with_payload(page_view))
                .map_err(|e| ConsumeError::failed(e.to_string()));
        }
        if ev.kind() == &kinds.qualified {
            info!("showing reward banner");
        } else if ev.kind() == &kinds.claimed {
            info!("hiding reward banner");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "flow"
    }
}

/// Ships page-view hits; wants the general kind, so reward page views arrive too.
struct Analytics {
    wanted: Vec<Selector>,
}

impl Consume for Analytics {
    fn wanted(&self) -> &[Selector] {
        &self.wanted
    }

    fn consume(&self, ev: &Event) -> Result<(), ConsumeError> {
        let pv = ev
            .payload::<PageView>()
            .ok_or_else(|| ConsumeError::rejected("page view without payload"))?;
        info!(page = pv.name, at = ?pv.at, kind = %ev.kind(), "page view hit");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "analytics"
    }
}

/// Tracks whether the user claimed the reward.
struct Model {
    bus: Bus,
    kinds: Arc<Kinds>,
    wanted: Vec<Selector>,
    claimed: AtomicBool,
}

impl Consume for Model {
    fn wanted(&self) -> &[Selector] {
        &self.wanted
    }

    fn consume(&self, ev: &Event) -> Result<(), ConsumeError> {
        let next = if ev.kind() == &self.kinds.reward_page_view {
            if self.claimed.load(Ordering::SeqCst) {
                return Ok(());
            }
            self.kinds.qualified.clone()
        } else {
            self.claimed.store(true, Ordering::SeqCst);
            self.kinds.claimed.clone()
        };
        self.bus
            .dispatch(Event::new(next))
            .map_err(|e| ConsumeError::failed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let kinds = Arc::new(Kinds::new()?);
    let bus = Bus::new();

    let flow = Arc::new(Flow {
        bus: bus.clone(),
        kinds: Arc::clone(&kinds),
        wanted: vec![
            Selector::Kind(kinds.navigation.clone()),
            Selector::Kind(kinds.qualified.clone()),
            Selector::Kind(kinds.claimed.clone()),
        ],
    });
    let analytics = Arc::new(Analytics {
        wanted: vec![Selector::Kind(kinds.page_view.clone())],
    });
    let model = Arc::new(Model {
        bus: bus.clone(),
        kinds: Arc::clone(&kinds),
        wanted: vec![
            Selector::Kind(kinds.reward_page_view.clone()),
            Selector::Kind(kinds.claim.clone()),
        ],
        claimed: AtomicBool::new(false),
    });
    let logger = Arc::new(LogWriter::new());

    bus.register(&flow);
    bus.register(&analytics);
    bus.register(&model);
    bus.register(&logger);

    bus.dispatch(Event::new(kinds.navigation.clone()).with_payload(Destination::ScreenOne))?;
    bus.dispatch(Event::new(kinds.navigation.clone()).with_payload(Destination::Reward))?;
    bus.dispatch(Event::new(kinds.claim.clone()))?;

    // after claiming, revisiting the reward screen no longer qualifies
    bus.dispatch(Event::new(kinds.navigation.clone()).with_payload(Destination::Reward))?;

    bus.deregister(&logger);
    info!(consumers = bus.len(), "done");
    Ok(())
}
