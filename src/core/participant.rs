use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a person taking part in a shared expense.
///
/// Identifiers are compared verbatim: `"alice"` and `"Alice"` are two
/// different people.
///
/// # Examples
///
/// ```
/// use split_settle::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("Alice");
/// let bob = ParticipantId::new("Bob");
/// assert_ne!(alice, bob);
/// assert!(alice < bob);
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_equality() {
        assert_eq!(ParticipantId::new("Alice"), ParticipantId::from("Alice"));
        assert_ne!(ParticipantId::new("Alice"), ParticipantId::new("alice"));
    }

    #[test]
    fn test_participant_display() {
        let p = ParticipantId::new("Carol");
        assert_eq!(format!("{}", p), "Carol");
    }

    #[test]
    fn test_participant_blank() {
        assert!(ParticipantId::default().is_blank());
        assert!(ParticipantId::new("   ").is_blank());
        assert!(!ParticipantId::new(" x ").is_blank());
    }

    #[test]
    fn test_participant_serde_is_bare_string() {
        let json = serde_json::to_string(&ParticipantId::new("Dan")).unwrap();
        assert_eq!(json, "\"Dan\"");
        let back: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "Dan");
    }
}
