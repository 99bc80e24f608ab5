//! Recording identifier value object

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix appended to the creation timestamp
const SUFFIX_LEN: usize = 9;

/// Unique identifier of a recording.
///
/// Generated once at creation as `<unix-millis>-<suffix>` and never
/// recomputed. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingId(String);

impl RecordingId {
    /// Generate a fresh identifier from the current time and a random suffix
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(SUFFIX_LEN)
            .collect();
        Self(format!("{}-{}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RecordingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_id_has_timestamp_and_suffix() {
        let id = RecordingId::generate();
        let (millis, suffix) = id.as_str().split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<_> = (0..1000).map(|_| RecordingId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordingId::from("1700000000000-abc123def");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1700000000000-abc123def\"");
    }
}
