//! Namespaced keys shared by catalogue cache adapters.
use thiserror::Error;

use crate::domain::{EventId, TopEventsLimit};

/// Key of the sellable events set.
pub const SELLABLE_INDEX_KEY: &str = "events:sellable";

/// Cache key for catalogue projections.
///
/// # Examples
/// ```
/// use ticketing::domain::EventId;
/// use ticketing::domain::ports::CacheKey;
///
/// let id = EventId::new("jazz-night").expect("valid id");
/// assert_eq!(CacheKey::event(&id).as_str(), "event:jazz-night");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a cache key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Snapshot of a single event.
    pub fn event(id: &EventId) -> Self {
        Self(format!("event:{id}"))
    }

    /// Set of event identifiers that are currently sellable.
    pub fn sellable_index() -> Self {
        Self(SELLABLE_INDEX_KEY.to_owned())
    }

    /// Marker written alongside the sellable set so an emptied set can be told
    /// apart from one that was never built.
    pub fn sellable_index_marker() -> Self {
        Self(format!("{SELLABLE_INDEX_KEY}:built"))
    }

    /// Top events ranking for one limit.
    pub fn top_events(limit: TopEventsLimit) -> Self {
        Self(format!("analytics:top-events:{}", limit.get()))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}
