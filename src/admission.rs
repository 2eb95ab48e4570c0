//! # Admission: does a consumer receive an event?
//!
//! [`evaluate`] applies the bus's precedence rules to a consumer's `wanted` and
//! `excluded` lists and an event kind. The first applicable rule decides:
//!
//! ```text
//! 1. excluded ∋ None          → admit      (override: deliver everything)
//! 2. wanted   ∋ None          → refuse     (opted out of everything)
//! 3. wanted   ∋ All           → admit
//! 4. excluded ∋ All           → refuse
//! 5. excluded matches kind    → refuse
//! 6. wanted   misses kind     → refuse
//! 7. otherwise                → admit
//! ```
//!
//! Kind matching in rules 5 and 6 is hierarchical: a selector for `page_view`
//! matches `page_view.user_reward` (see [`EventKind::is_a`]).
//!
//! The order is load-bearing: swapping rules 1/2 or 3/4 changes what consumers
//! combining sentinels receive.

use crate::events::{EventKind, Selector};

/// Outcome of [`evaluate`], naming the rule that decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Rule 1: `excluded` contains [`Selector::None`].
    ExcludedNone,
    /// Rule 2: `wanted` contains [`Selector::None`].
    WantedNone,
    /// Rule 3: `wanted` contains [`Selector::All`].
    WantedAll,
    /// Rule 4: `excluded` contains [`Selector::All`].
    ExcludedAll,
    /// Rule 5: an `excluded` selector matches the kind.
    ExcludedKind,
    /// Rule 6: no `wanted` selector matches the kind.
    NotWanted,
    /// Rule 7: a `wanted` selector matches the kind.
    Wanted,
}

impl Verdict {
    /// Returns `true` if the consumer should receive the event.
    #[inline]
    pub fn admits(self) -> bool {
        matches!(
            self,
            Verdict::ExcludedNone | Verdict::WantedAll | Verdict::Wanted
        )
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            Verdict::ExcludedNone => "excluded_none",
            Verdict::WantedNone => "wanted_none",
            Verdict::WantedAll => "wanted_all",
            Verdict::ExcludedAll => "excluded_all",
            Verdict::ExcludedKind => "excluded_kind",
            Verdict::NotWanted => "not_wanted",
            Verdict::Wanted => "wanted",
        }
    }
}

/// Decides whether a consumer with these lists receives an event of `kind`.
pub fn evaluate(wanted: &[Selector], excluded: &[Selector], kind: &EventKind) -> Verdict {
    if excluded.iter().any(Selector::is_wildcard_none) {
        return Verdict::ExcludedNone;
    }
    if wanted.iter().any(Selector::is_wildcard_none) {
        return Verdict::WantedNone;
    }
    if wanted.iter().any(Selector::is_wildcard_all) {
        return Verdict::WantedAll;
    }
    if excluded.iter().any(Selector::is_wildcard_all) {
        return Verdict::ExcludedAll;
    }
    if excluded.iter().any(|s| s.matches(kind)) {
        return Verdict::ExcludedKind;
    }
    if !wanted.iter().any(|s| s.matches(kind)) {
        return Verdict::NotWanted;
    }
    Verdict::Wanted
}
