//! Whole-collection persistence for recording metadata

use tracing::{debug, warn};

use crate::domain::recording::Collection;

use super::ports::{KeyValueStore, StorageError};

/// Key under which the serialized collection is stored
pub const STORAGE_KEY: &str = "VOICE_NOTES_DB";

/// Loads and saves the full recording collection as one JSON blob
pub struct RecordingStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> RecordingStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the persisted collection.
    ///
    /// Missing, unreadable or malformed data yields an empty collection.
    /// Repeated ids keep only their first entry.
    pub async fn load(&self) -> Collection {
        let raw = match self.store.get(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Collection::new(),
            Err(e) => {
                warn!(error = %e, "could not load recordings");
                return Collection::new();
            }
        };

        match serde_json::from_str::<Collection>(&raw) {
            Ok(mut collection) => {
                let dropped = collection.dedup_ids();
                if !dropped.is_empty() {
                    warn!(?dropped, "stored recordings repeat ids, keeping the first of each");
                }
                debug!(count = collection.len(), "loaded recordings");
                collection
            }
            Err(e) => {
                warn!(error = %e, "stored recordings are malformed, starting empty");
                Collection::new()
            }
        }
    }

    /// Overwrite the persisted collection
    pub async fn save(&self, collection: &Collection) -> Result<(), StorageError> {
        let raw = serde_json::to_string(collection)
            .map_err(|e| StorageError::SerializeFailed(e.to_string()))?;

        self.store.set(STORAGE_KEY, &raw).await.inspect_err(|e| {
            warn!(error = %e, "could not save recordings");
        })?;

        debug!(count = collection.len(), "saved recordings");
        Ok(())
    }
}
