use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Learner.
///
/// Identifiers are assigned by the remote store and are positive. Negative
/// values are reserved for locally-pending records that have not been
/// persisted yet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LearnerId(i64);

impl LearnerId {
    /// Creates a new `LearnerId`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }

    /// True for locally-assigned placeholder ids awaiting store confirmation.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Debug for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LearnerId({})", self.0)
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a `LearnerId` from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError;

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse LearnerId from string")
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for LearnerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(LearnerId::new).map_err(|_| ParseIdError)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learner_id_display() {
        let id = LearnerId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn learner_id_from_str() {
        let id: LearnerId = "123".parse().unwrap();
        assert_eq!(id, LearnerId::new(123));
    }

    #[test]
    fn learner_id_from_str_invalid() {
        let result = "not-a-number".parse::<LearnerId>();
        assert!(result.is_err());
    }

    #[test]
    fn placeholder_ids_are_negative() {
        assert!(LearnerId::new(-1).is_placeholder());
        assert!(!LearnerId::new(0).is_placeholder());
        assert!(!LearnerId::new(7).is_placeholder());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&LearnerId::new(-3)).unwrap();
        assert_eq!(json, "-3");
        let back: LearnerId = serde_json::from_str("17").unwrap();
        assert_eq!(back, LearnerId::new(17));
    }
}
