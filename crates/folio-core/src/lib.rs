#![forbid(unsafe_code)]

//! Headless core of folio: the outline parser, book/highlight/mind-map models, map generation
//! from highlights, and the storage collaborator.
//!
//! Layout and rendering live in `folio-render`; this crate never computes geometry.

pub mod config;
pub mod error;
pub mod generate;
pub mod models;
pub mod outline;
pub mod storage;

pub use config::FolioConfig;
pub use error::{Error, Result};
pub use generate::{new_blank_map, new_map_from_book, outline_from_book};
pub use models::{Book, Highlight, LayoutNode, MindMap};
pub use outline::{OutlineNode, parse_outline};
pub use storage::{Backup, MemoryStore, Storage, search_books};
