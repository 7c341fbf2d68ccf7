//! Identifier types for chat messages.
//!
//! Message identifiers are plain integers on the wire (they round-trip
//! through the persisted JSON array), wrapped in a newtype for compile-time
//! safety. Generation is a process-local monotonic counter seeded from the
//! creation clock, so two messages created in the same millisecond can never
//! collide and deletion-by-id always removes exactly one entry.

use core::fmt;
use core::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Unique identifier of a single chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl MessageId {
    /// Extract the underlying integer.
    #[inline]
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(value.parse()?))
    }
}

/// Monotonic generator for [`MessageId`]s.
///
/// Seeded from the current epoch millis and incremented per issued id.
#[derive(Debug)]
pub struct MessageIdGenerator {
    next: AtomicI64,
}

impl MessageIdGenerator {
    /// Create a generator seeded from the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis())
    }

    /// Create a generator with an explicit starting value.
    #[must_use]
    pub const fn starting_at(seed: i64) -> Self {
        Self {
            next: AtomicI64::new(seed),
        }
    }

    /// Issue the next unique identifier.
    pub fn next(&self) -> MessageId {
        MessageId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Bump the counter above an already-used identifier.
    ///
    /// Called for every rehydrated message so a restarted session can never
    /// reissue a persisted id.
    pub fn observe(&self, id: MessageId) {
        self.next.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for MessageIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let ids = MessageIdGenerator::starting_at(10);
        let first = ids.next();
        let second = ids.next();
        let third = ids.next();
        assert_eq!(first, MessageId(10));
        assert!(first < second && second < third);
    }

    #[test]
    fn test_observe_prevents_reissue() {
        let ids = MessageIdGenerator::starting_at(5);
        ids.observe(MessageId(42));
        assert_eq!(ids.next(), MessageId(43));
    }

    #[test]
    fn test_observe_saturates_at_the_largest_id() {
        let ids = MessageIdGenerator::starting_at(5);
        ids.observe(MessageId(i64::MAX));
        assert_eq!(ids.next(), MessageId(i64::MAX));
    }

    #[test]
    fn test_observe_ignores_older_ids() {
        let ids = MessageIdGenerator::starting_at(100);
        ids.observe(MessageId(7));
        assert_eq!(ids.next(), MessageId(100));
    }

    #[test]
    fn test_id_round_trips_through_string() {
        let id = MessageId(1_700_000_000_123);
        let parsed: MessageId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
