use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Storage;
use crate::models::{Book, MindMap};
use crate::{Error, Result};

/// Whole-store JSON backup, in the file layout of the browser tool's "Export data" button.
///
/// A section that is absent (or `null`) in the file is `None` and leaves that collection of the
/// store untouched on restore; a present section, even an empty one, replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mindmaps: Option<Vec<MindMap>>,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Backup {
    pub fn export<S: Storage + ?Sized>(store: &S, now: DateTime<Utc>) -> Self {
        Self {
            books: Some(store.books()),
            mindmaps: Some(store.mind_maps()),
            exported_at: Some(now),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidBackup {
            message: e.to_string(),
        })
    }

    pub fn book_count(&self) -> usize {
        self.books.as_ref().map_or(0, Vec::len)
    }

    pub fn mind_map_count(&self) -> usize {
        self.mindmaps.as_ref().map_or(0, Vec::len)
    }

    /// Replaces each collection of `store` whose section is present in the backup.
    pub fn restore_into<S: Storage + ?Sized>(self, store: &mut S) {
        tracing::debug!(
            books = ?self.books.as_ref().map(Vec::len),
            mindmaps = ?self.mindmaps.as_ref().map(Vec::len),
            "restoring backup"
        );
        if let Some(books) = self.books {
            store.replace_books(books);
        }
        if let Some(maps) = self.mindmaps {
            store.replace_mind_maps(maps);
        }
    }
}
