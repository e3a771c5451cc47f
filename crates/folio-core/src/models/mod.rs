mod book;
mod mind_map;

pub use book::{Book, Highlight};
pub use mind_map::{LayoutNode, MindMap};

/// Fresh random identifier for books, highlights and maps.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
