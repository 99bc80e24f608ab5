//! Ordered collection of recordings

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::CollectionError;

use super::id::RecordingId;
use super::meta::RecordingMeta;

/// The full, newest-first set of recordings.
///
/// Persisted as a single JSON array. Ids are unique within the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<RecordingMeta>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordingMeta> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[RecordingMeta] {
        &self.items
    }

    pub fn get(&self, id: &RecordingId) -> Option<&RecordingMeta> {
        self.items.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RecordingId) -> bool {
        self.get(id).is_some()
    }

    /// Insert a new recording at the front
    pub fn insert_newest(&mut self, meta: RecordingMeta) -> Result<(), CollectionError> {
        if self.contains(&meta.id) {
            return Err(CollectionError::DuplicateId(meta.id.to_string()));
        }
        self.items.insert(0, meta);
        Ok(())
    }

    /// Change the display name of a recording.
    ///
    /// The new name is trimmed; an empty result is rejected.
    pub fn rename(&mut self, id: &RecordingId, name: &str) -> Result<&RecordingMeta, CollectionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CollectionError::EmptyName);
        }

        let item = self
            .items
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        item.name = name.to_string();
        Ok(item)
    }

    /// Remove a recording, returning it
    pub fn remove(&mut self, id: &RecordingId) -> Result<RecordingMeta, CollectionError> {
        let pos = self
            .items
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        Ok(self.items.remove(pos))
    }

    /// Drop every entry whose id already appeared earlier in the list.
    ///
    /// Returns the ids that were dropped, in order.
    pub fn dedup_ids(&mut self) -> Vec<RecordingId> {
        let mut seen = HashSet::new();
        let mut dropped = Vec::new();
        self.items.retain(|r| {
            if seen.insert(r.id.clone()) {
                true
            } else {
                dropped.push(r.id.clone());
                false
            }
        });
        dropped
    }

    /// Case-insensitive substring match against names.
    ///
    /// A blank query returns every recording in order.
    pub fn filter(&self, query: &str) -> Vec<&RecordingMeta> {
        if query.trim().is_empty() {
            return self.items.iter().collect();
        }
        let query = query.to_lowercase();
        self.items
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&query))
            .collect()
    }
}

impl From<Vec<RecordingMeta>> for Collection {
    fn from(items: Vec<RecordingMeta>) -> Self {
        Self { items }
    }
}

impl IntoIterator for Collection {
    type Item = RecordingMeta;
    type IntoIter = std::vec::IntoIter<RecordingMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, name: &str) -> RecordingMeta {
        RecordingMeta {
            id: RecordingId::from(id),
            uri: format!("/notes/{}.wav", id),
            name: name.to_string(),
            date: "2024-01-15T10:30:00.000Z".to_string(),
            duration_millis: 1_000,
        }
    }

    fn sample() -> Collection {
        let mut c = Collection::new();
        c.insert_newest(meta("1", "Grocery list")).unwrap();
        c.insert_newest(meta("2", "Meeting notes")).unwrap();
        c.insert_newest(meta("3", "grocery reminder")).unwrap();
        c
    }

    #[test]
    fn insert_is_newest_first() {
        let c = sample();
        let ids: Vec<_> = c.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut c = sample();
        let err = c.insert_newest(meta("2", "again")).unwrap_err();
        assert_eq!(err, CollectionError::DuplicateId("2".to_string()));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn rename_changes_only_name() {
        let mut c = sample();
        let before = c.get(&RecordingId::from("2")).unwrap().clone();

        c.rename(&RecordingId::from("2"), "  Retro  ").unwrap();

        let after = c.get(&RecordingId::from("2")).unwrap();
        assert_eq!(after.name, "Retro");
        assert_eq!(after.id, before.id);
        assert_eq!(after.uri, before.uri);
        assert_eq!(after.date, before.date);
        assert_eq!(after.duration_millis, before.duration_millis);
    }

    #[test]
    fn rename_rejects_blank_name() {
        let mut c = sample();
        assert_eq!(
            c.rename(&RecordingId::from("2"), "   ").unwrap_err(),
            CollectionError::EmptyName
        );
        assert_eq!(c.get(&RecordingId::from("2")).unwrap().name, "Meeting notes");
    }

    #[test]
    fn rename_unknown_id() {
        let mut c = sample();
        assert!(matches!(
            c.rename(&RecordingId::from("nope"), "x"),
            Err(CollectionError::NotFound(_))
        ));
    }

    #[test]
    fn remove_returns_item() {
        let mut c = sample();
        let removed = c.remove(&RecordingId::from("2")).unwrap();
        assert_eq!(removed.name, "Meeting notes");
        assert!(!c.contains(&RecordingId::from("2")));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn filter_is_case_insensitive_subset() {
        let c = sample();
        let names: Vec<_> = c.filter("GROCERY").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["grocery reminder", "Grocery list"]);
    }

    #[test]
    fn filter_empty_query_returns_everything() {
        let c = sample();
        assert_eq!(c.filter("").len(), 3);
        assert_eq!(c.filter("   ").len(), 3);
        let ids: Vec<_> = c.filter("").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn filter_no_match() {
        assert!(sample().filter("podcast").is_empty());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut c = Collection::from(vec![
            meta("1", "first"),
            meta("2", "other"),
            meta("1", "second"),
            meta("1", "third"),
        ]);

        let dropped = c.dedup_ids();

        assert_eq!(dropped, vec![RecordingId::from("1"), RecordingId::from("1")]);
        let names: Vec<_> = c.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "other"]);
    }

    #[test]
    fn dedup_without_duplicates_is_noop() {
        let mut c = sample();
        assert!(c.dedup_ids().is_empty());
        assert_eq!(c, sample());
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Collection::new()).unwrap();
        assert_eq!(json, "[]");
    }
}
