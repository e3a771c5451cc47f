//! Persistence collaborator for books and mind maps.
//!
//! The core only needs the [`Storage`] trait; [`MemoryStore`] is the in-process implementation
//! used by the CLI and tests. Durable backends plug in behind the same trait.

mod backup;

pub use backup::Backup;

use crate::models::{Book, MindMap};

pub trait Storage {
    fn books(&self) -> Vec<Book>;
    fn get_book(&self, id: &str) -> Option<Book>;
    /// Inserts `book`, or replaces the stored book with the same id in place.
    fn save_book(&mut self, book: Book);
    /// Deletes a book and every mind map that belongs to it. Returns whether the book existed.
    fn delete_book(&mut self, id: &str) -> bool;

    fn mind_maps(&self) -> Vec<MindMap>;
    fn get_mind_map(&self, id: &str) -> Option<MindMap>;
    /// Inserts `map`, or replaces the stored map with the same id in place.
    fn save_mind_map(&mut self, map: MindMap);
    fn delete_mind_map(&mut self, id: &str) -> bool;

    /// Swaps the whole book collection for `books`. Maps are left alone.
    fn replace_books(&mut self, books: Vec<Book>);
    /// Swaps the whole mind-map collection for `maps`.
    fn replace_mind_maps(&mut self, maps: Vec<MindMap>);

    fn mind_maps_for_book(&self, book_id: &str) -> Vec<MindMap> {
        self.mind_maps()
            .into_iter()
            .filter(|m| m.book_id.as_deref() == Some(book_id))
            .collect()
    }
}

/// Insertion-ordered in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    books: Vec<Book>,
    maps: Vec<MindMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.maps.is_empty()
    }
}

impl Storage for MemoryStore {
    fn books(&self) -> Vec<Book> {
        self.books.clone()
    }

    fn get_book(&self, id: &str) -> Option<Book> {
        self.books.iter().find(|b| b.id == id).cloned()
    }

    fn save_book(&mut self, book: Book) {
        tracing::debug!(id = %book.id, "save book");
        upsert(&mut self.books, book, |b| &b.id);
    }

    fn delete_book(&mut self, id: &str) -> bool {
        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        let removed = self.books.len() != before;

        let maps_before = self.maps.len();
        self.maps.retain(|m| m.book_id.as_deref() != Some(id));
        tracing::debug!(
            id,
            removed,
            cascaded_maps = maps_before - self.maps.len(),
            "delete book"
        );
        removed
    }

    fn mind_maps(&self) -> Vec<MindMap> {
        self.maps.clone()
    }

    fn get_mind_map(&self, id: &str) -> Option<MindMap> {
        self.maps.iter().find(|m| m.id == id).cloned()
    }

    fn save_mind_map(&mut self, map: MindMap) {
        tracing::debug!(id = %map.id, "save mind map");
        upsert(&mut self.maps, map, |m| &m.id);
    }

    fn delete_mind_map(&mut self, id: &str) -> bool {
        let before = self.maps.len();
        self.maps.retain(|m| m.id != id);
        before != self.maps.len()
    }

    fn replace_books(&mut self, books: Vec<Book>) {
        tracing::debug!(count = books.len(), "replace books");
        self.books = books;
    }

    fn replace_mind_maps(&mut self, maps: Vec<MindMap>) {
        tracing::debug!(count = maps.len(), "replace mind maps");
        self.maps = maps;
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> &String) {
    match items.iter().position(|existing| id(existing) == id(&item)) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

/// Books whose title or author contains `query`, case-insensitively. An empty query matches all.
pub fn search_books<S: Storage + ?Sized>(store: &S, query: &str) -> Vec<Book> {
    store
        .books()
        .into_iter()
        .filter(|b| b.matches(query))
        .collect()
}
