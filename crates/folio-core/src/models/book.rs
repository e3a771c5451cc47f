use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A cataloged book and its highlights, in the field naming of the backup file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default = "default_cover_color")]
    pub cover_color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

fn default_cover_color() -> String {
    crate::config::DEFAULT_PALETTE[0].to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Highlight {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            text: text.into(),
            chapter: None,
            tags: Vec::new(),
            color: None,
        }
    }

    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The chapter this highlight groups under; an empty or whitespace-only chapter counts as
    /// none.
    pub fn chapter_name(&self) -> Option<&str> {
        self.chapter
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl Book {
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            author: None,
            cover_color: default_cover_color(),
            created_at,
            highlights: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn add_highlight(&mut self, highlight: Highlight) {
        self.highlights.push(highlight);
    }

    pub fn update_highlight(&mut self, index: usize, highlight: Highlight) -> Result<()> {
        let len = self.highlights.len();
        let slot = self
            .highlights
            .get_mut(index)
            .ok_or(Error::HighlightOutOfRange { index, len })?;
        *slot = highlight;
        Ok(())
    }

    pub fn remove_highlight(&mut self, index: usize) -> Result<Highlight> {
        if index >= self.highlights.len() {
            return Err(Error::HighlightOutOfRange {
                index,
                len: self.highlights.len(),
            });
        }
        Ok(self.highlights.remove(index))
    }

    /// Case-insensitive substring match over title and author.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&q)
            || self
                .author
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&q))
    }
}
