//! # Event kinds and consumer selectors.
//!
//! An [`EventKind`] is a dotted path of segments (`page_view.user_reward`). Kinds form a
//! hierarchy by prefix: a kind *is a* every ancestor path at a segment boundary, so a
//! consumer selecting `page_view` also receives `page_view.user_reward`.
//!
//! A [`Selector`] is what consumers put on their `wanted` / `excluded` lists: either a
//! concrete kind or one of the two sentinels [`Selector::All`] and [`Selector::None`].
//!
//! ## Reserved kinds
//! The root segment `bus` is reserved for events produced by the bus itself
//! (`bus.consumed`, selected with [`Selector::consumed`]). [`EventKind::new`] and
//! [`EventKind::child`] refuse to build kinds under it, and the bus refuses to
//! dispatch an event of a reserved kind that it did not create.
//!
//! ## Example
//! ```rust
//! use relaybus::{EventKind, Selector};
//!
//! let page_view = EventKind::new("page_view").unwrap();
//! let reward = page_view.child("user_reward").unwrap();
//!
//! assert!(reward.is_a(&page_view));
//! assert!(!page_view.is_a(&reward));
//! assert!(Selector::Kind(page_view).matches(&reward));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::KindError;

/// Separator between kind segments.
const SEP: char = '.';

/// Root segment reserved for bus-generated kinds.
const RESERVED_ROOT: &str = "bus";

/// Full path of the consumed-notification kind.
const CONSUMED_PATH: &str = "bus.consumed";

/// Hierarchical event classification.
///
/// Cheap to clone (`Arc<str>` inside).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKind {
    path: Arc<str>,
}

impl EventKind {
    /// Parses and validates a dotted kind path.
    ///
    /// ### Rules
    /// - the path is non-empty and has no empty segments;
    /// - segments use ASCII alphanumerics, `_` and `-` only;
    /// - the first segment is not the reserved `bus` root.
    pub fn new(path: impl AsRef<str>) -> Result<Self, KindError> {
        let path = path.as_ref();
        if path.is_empty() {
            return Err(KindError::Empty);
        }
        for segment in path.split(SEP) {
            validate_segment(path, segment)?;
        }
        if path.split(SEP).next() == Some(RESERVED_ROOT) {
            return Err(KindError::Reserved {
                path: path.to_string(),
            });
        }
        Ok(Self { path: path.into() })
    }

    /// Kind of the notifications the bus emits after every successful consumption.
    pub(crate) fn consumed() -> Self {
        Self {
            path: CONSUMED_PATH.into(),
        }
    }

    /// Returns a more specific kind nested under `self`.
    ///
    /// Fails with [`KindError::Reserved`] when `self` lives under the reserved root.
    pub fn child(&self, segment: &str) -> Result<Self, KindError> {
        let path = format!("{}{SEP}{segment}", self.path);
        validate_segment(&path, segment)?;
        if self.is_reserved() {
            return Err(KindError::Reserved { path });
        }
        Ok(Self { path: path.into() })
    }

    /// Returns the direct parent kind, or `None` for a root kind.
    pub fn parent(&self) -> Option<Self> {
        self.path.rsplit_once(SEP).map(|(parent, _)| Self {
            path: parent.into(),
        })
    }

    /// Iterates over path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(SEP)
    }

    /// Returns the full dotted path.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns `true` if `self` equals `ancestor` or is nested under it.
    pub fn is_a(&self, ancestor: &EventKind) -> bool {
        match self.path.strip_prefix(ancestor.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with(SEP),
            None => false,
        }
    }

    /// Returns `true` if the root segment is the one reserved for the bus.
    pub fn is_reserved(&self) -> bool {
        self.segments().next() == Some(RESERVED_ROOT)
    }

    /// Returns `true` for the bus-generated consumed-notification kind.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        &*self.path == CONSUMED_PATH
    }
}

fn validate_segment(path: &str, segment: &str) -> Result<(), KindError> {
    if segment.is_empty() {
        return Err(KindError::EmptySegment {
            path: path.to_string(),
        });
    }
    let valid = segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(KindError::InvalidSegment {
            segment: segment.to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl fmt::Debug for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventKind({})", self.path)
    }
}

/// Entry of a consumer's `wanted` or `excluded` list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Wildcard-All: every event kind.
    All,
    /// Wildcard-None: no event kind in `wanted`; in `excluded` it forces full delivery.
    None,
    /// A kind and everything nested under it.
    Kind(EventKind),
}

impl Selector {
    /// Builds a [`Selector::Kind`] from a kind path.
    pub fn kind(path: impl AsRef<str>) -> Result<Self, KindError> {
        EventKind::new(path).map(Selector::Kind)
    }

    /// Selects consumed notifications emitted by the bus.
    pub fn consumed() -> Self {
        Selector::Kind(EventKind::consumed())
    }

    /// Returns `true` if this is a kind selector covering `kind`.
    ///
    /// Sentinels never match here; they are resolved by the admission rules.
    #[inline]
    pub fn matches(&self, kind: &EventKind) -> bool {
        match self {
            Selector::Kind(selected) => kind.is_a(selected),
            Selector::All | Selector::None => false,
        }
    }

    /// Returns `true` for the [`Selector::All`] wildcard.
    #[inline]
    pub fn is_wildcard_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// Returns `true` for the [`Selector::None`] wildcard.
    #[inline]
    pub fn is_wildcard_none(&self) -> bool {
        matches!(self, Selector::None)
    }
}

impl From<EventKind> for Selector {
    fn from(kind: EventKind) -> Self {
        Selector::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(path: &str) -> EventKind {
        EventKind::new(path).unwrap()
    }

    #[test]
    fn test_rejects_malformed_paths() {
        assert_eq!(EventKind::new(""), Err(KindError::Empty));
        assert!(matches!(
            EventKind::new("page_view..reward"),
            Err(KindError::EmptySegment { .. })
        ));
        assert!(matches!(
            EventKind::new(".page_view"),
            Err(KindError::EmptySegment { .. })
        ));
        assert!(matches!(
            EventKind::new("page view"),
            Err(KindError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn test_rejects_reserved_root() {
        assert!(matches!(
            EventKind::new("bus"),
            Err(KindError::Reserved { .. })
        ));
        assert!(matches!(
            EventKind::new("bus.consumed"),
            Err(KindError::Reserved { .. })
        ));
        // only the root segment is reserved
        assert!(EventKind::new("omnibus").is_ok());
        assert!(EventKind::new("app.bus").is_ok());
    }

    #[test]
    fn test_hierarchy_matches_on_segment_boundary() {
        let page_view = kind("page_view");
        let reward = kind("page_view.user_reward");

        assert!(reward.is_a(&page_view));
        assert!(page_view.is_a(&page_view));
        assert!(!page_view.is_a(&reward));
        assert!(!kind("page_viewer").is_a(&page_view));
    }

    #[test]
    fn test_child_and_parent() {
        let page_view = kind("page_view");
        let reward = page_view.child("user_reward").unwrap();

        assert_eq!(reward.as_str(), "page_view.user_reward");
        assert_eq!(reward.parent(), Some(page_view.clone()));
        assert_eq!(page_view.parent(), None);
        assert_eq!(
            reward.segments().collect::<Vec<_>>(),
            vec!["page_view", "user_reward"]
        );
        assert!(page_view.child("a.b").is_err());
    }

    #[test]
    fn test_consumed_kind() {
        let consumed = EventKind::consumed();
        assert!(consumed.is_consumed());
        assert!(!kind("consumed").is_consumed());
        assert!(Selector::consumed().matches(&consumed));
    }

    #[test]
    fn test_no_children_under_reserved_root() {
        let consumed = EventKind::consumed();
        assert!(consumed.is_reserved());
        assert!(!kind("omnibus").is_reserved());
        assert_eq!(
            consumed.child("spoof"),
            Err(KindError::Reserved {
                path: "bus.consumed.spoof".into()
            })
        );
        assert!(matches!(
            consumed.parent().map(|root| root.child("other")),
            Some(Err(KindError::Reserved { .. }))
        ));
    }

    #[test]
    fn test_wildcard_predicates() {
        assert!(Selector::All.is_wildcard_all());
        assert!(!Selector::All.is_wildcard_none());
        assert!(Selector::None.is_wildcard_none());
        assert!(!Selector::consumed().is_wildcard_all());
        assert!(!Selector::consumed().is_wildcard_none());
    }

    #[test]
    fn test_sentinels_never_match_kinds() {
        let k = kind("navigation");
        assert!(!Selector::All.matches(&k));
        assert!(!Selector::None.matches(&k));
        assert!(Selector::kind("navigation").unwrap().matches(&k));
    }

    #[test]
    fn test_display_and_debug() {
        let k = kind("page_view.user_reward");
        assert_eq!(k.to_string(), "page_view.user_reward");
        assert_eq!(format!("{k:?}"), "EventKind(page_view.user_reward)");
    }
}
