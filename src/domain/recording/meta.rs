//! Recording metadata entity

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::id::RecordingId;

/// Metadata for one voice note.
///
/// This is the only persisted entity. `uri` references the audio file but
/// does not own it; `date` and `duration_millis` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMeta {
    pub id: RecordingId,
    pub uri: String,
    pub name: String,
    pub date: String,
    pub duration_millis: u64,
}

impl RecordingMeta {
    /// Build metadata for a freshly captured note
    pub fn new(id: RecordingId, uri: impl Into<String>, duration_millis: u64) -> Self {
        Self::created_at(id, uri, duration_millis, Utc::now())
    }

    /// Build metadata with an explicit creation instant
    pub fn created_at(
        id: RecordingId,
        uri: impl Into<String>,
        duration_millis: u64,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            uri: uri.into(),
            name: default_name(created.with_timezone(&Local)),
            date: created.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_millis,
        }
    }

    /// Path of the backing audio file
    pub fn path(&self) -> PathBuf {
        Path::new(&self.uri).to_path_buf()
    }
}

/// Default display name, e.g. "Voice Note 1/15/2024"
fn default_name(date: DateTime<Local>) -> String {
    format!("Voice Note {}", date.format("%-m/%-d/%Y"))
}
