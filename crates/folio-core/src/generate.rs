//! Seeding mind-map outlines from a book's highlights.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::config::GenerateConfig;
use crate::models::{Book, Highlight, MindMap};
use crate::{Error, Result};

/// Builds the outline text for a book.
///
/// The root line is the book title. Chaptered highlights are grouped under one tab-indented line
/// per chapter (chapters in first-appearance order, highlights double-indented below); highlights
/// without a chapter follow as single-indented lines.
pub fn outline_from_book(book: &Book, config: &GenerateConfig) -> Result<String> {
    if book.highlights.is_empty() {
        return Err(Error::NoHighlights {
            book_id: book.id.clone(),
        });
    }

    let mut chapters: IndexMap<&str, Vec<&Highlight>> = IndexMap::new();
    let mut unchaptered: Vec<&Highlight> = Vec::new();
    for h in &book.highlights {
        match h.chapter_name() {
            Some(ch) => chapters.entry(ch).or_default().push(h),
            None => unchaptered.push(h),
        }
    }

    let mut out = String::new();
    push_line(&mut out, 0, &single_line(&book.title));
    for (chapter, highlights) in &chapters {
        push_line(&mut out, 1, &single_line(chapter));
        for h in highlights {
            push_line(&mut out, 2, &highlight_label(h, config.highlight_max_chars));
        }
    }
    for h in &unchaptered {
        push_line(&mut out, 1, &highlight_label(h, config.highlight_max_chars));
    }

    tracing::debug!(
        book = %book.id,
        chapters = chapters.len(),
        unchaptered = unchaptered.len(),
        "generated outline from highlights"
    );
    Ok(out)
}

/// A new map for `book`, titled after it and seeded from its highlights.
pub fn new_map_from_book(
    book: &Book,
    config: &GenerateConfig,
    now: DateTime<Utc>,
) -> Result<MindMap> {
    let outline = outline_from_book(book, config)?;
    let mut map = MindMap::new(format!("Mind Map: {}", book.title), outline, now);
    map.book_id = Some(book.id.clone());
    Ok(map)
}

/// A standalone map with the starter outline.
pub fn new_blank_map(now: DateTime<Utc>) -> MindMap {
    MindMap::blank(now)
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push('\t');
    }
    out.push_str(text);
    out.push('\n');
}

// Every generated node must stay on one outline line: a line break would be parsed as an extra
// node, and leading whitespace as extra depth. Other spacing is kept as written.
fn single_line(text: &str) -> String {
    text.trim().replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn highlight_label(h: &Highlight, max_chars: usize) -> String {
    let flat = single_line(&h.text);
    if flat.chars().count() <= max_chars {
        return flat;
    }
    tracing::warn!(highlight = %h.id, max_chars, "truncating highlight text");
    flat.chars().take(max_chars).collect::<String>().trim_end().to_string()
}
