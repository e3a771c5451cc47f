#![cfg(feature = "render")]

use folio::render::{FolioError, MapRenderer, create_map_from_book, import_backup};
use folio::storage::{MemoryStore, Storage};
use folio::{Book, Error, FolioConfig, Highlight};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn sample_backup() -> String {
    let path = workspace_root()
        .join("fixtures")
        .join("backup")
        .join("sample.json");
    std::fs::read_to_string(&path).expect("fixture")
}

#[test]
fn import_rederives_cached_roots() {
    let mut store = MemoryStore::new();
    let summary = import_backup(&mut store, &sample_backup()).expect("import");
    assert_eq!(summary.books, 2);
    assert_eq!(summary.mindmaps, 1);

    let map = store.get_mind_map("m-dune").expect("map");
    let root = map.root.expect("root re-derived");
    assert_eq!(root.label, "Dune");
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].children[0].label, "I must not fear");
    assert_eq!(root.children[0].x, 220.0);
}

#[test]
fn import_replaces_local_collections() {
    let mut store = MemoryStore::new();
    store.save_book(Book::new("Old Local Book", chrono::Utc::now()));
    let renderer = MapRenderer::default();
    let local_map = renderer.create_blank_map(&mut store);

    import_backup(&mut store, &sample_backup()).unwrap();
    let ids: Vec<_> = store.books().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["b-dune", "b-empty"]);
    assert!(store.get_mind_map(&local_map.id).is_none());

    let summary = import_backup(&mut store, r#"{ "books": [] }"#).unwrap();
    assert_eq!((summary.books, summary.mindmaps), (0, 0));
    assert!(store.books().is_empty());
    assert_eq!(store.mind_maps().len(), 1);
}

#[test]
fn import_rejects_malformed_json() {
    let mut store = MemoryStore::new();
    let err = import_backup(&mut store, "[1, 2").unwrap_err();
    assert!(matches!(
        err,
        FolioError::Core(Error::InvalidBackup { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn map_from_book_end_to_end() {
    let mut store = MemoryStore::new();
    import_backup(&mut store, &sample_backup()).unwrap();

    let map = create_map_from_book(&mut store, "b-dune").expect("map");
    assert_eq!(map.title, "Mind Map: Dune");
    assert_eq!(map.book_id.as_deref(), Some("b-dune"));
    assert!(map.outline.starts_with("Dune\n\tBook One\n\t\tI must not fear."));

    let root = map.root.as_ref().expect("laid out");
    let labels: Vec<_> = root.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels[..2], ["Book One", "Book Two"]);
    assert_eq!(root.children.len(), 3);
    assert_eq!(root.children[0].children.len(), 2);

    assert_eq!(store.mind_maps_for_book("b-dune").len(), 2);
}

#[test]
fn book_without_highlights_is_rejected_before_saving() {
    let mut store = MemoryStore::new();
    import_backup(&mut store, &sample_backup()).unwrap();
    let before = store.mind_maps().len();

    let err = create_map_from_book(&mut store, "b-empty").unwrap_err();
    assert!(matches!(err, FolioError::Core(Error::NoHighlights { .. })));
    assert!(
        err.to_string()
            .starts_with("Add some highlights first to create a mind map")
    );
    assert_eq!(store.mind_maps().len(), before);

    let err = create_map_from_book(&mut store, "missing").unwrap_err();
    assert!(matches!(err, FolioError::Core(Error::BookNotFound { .. })));
}

#[test]
fn deleting_a_book_removes_its_generated_maps() {
    let mut store = MemoryStore::new();
    let mut book = Book::new("Walden", chrono::Utc::now());
    book.add_highlight(Highlight::new("Simplify, simplify."));
    let id = book.id.clone();
    store.save_book(book);

    let renderer = MapRenderer::default();
    let map = renderer.create_map_from_book(&mut store, &id).unwrap();
    let blank = renderer.create_blank_map(&mut store);

    assert!(store.delete_book(&id));
    assert!(store.get_mind_map(&map.id).is_none());
    assert!(store.get_mind_map(&blank.id).is_some());
}

#[test]
fn config_overrides_flow_through_the_renderer() {
    let config = FolioConfig::from_json(
        r##"{
            "layout": { "levelSpacingX": 300 },
            "render": { "padding": 10, "palette": ["#123456"] }
        }"##,
    )
    .unwrap();
    let renderer = MapRenderer::with_config(config).unwrap();

    let layout = renderer.layout_text("R\n\tA");
    assert_eq!(layout.root.children[0].x, 300.0);

    let svg = renderer.render_svg_text("R\n\tA");
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let fills: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name("rect"))
        .filter_map(|n| n.attribute("fill"))
        .collect();
    assert_eq!(fills, vec!["#123456", "#123456"]);
    let first = doc.descendants().find(|n| n.has_tag_name("rect")).unwrap();
    assert_eq!(first.attribute("x"), Some("10"));
}

#[test]
fn map_svg_uses_sanitized_map_id() {
    let renderer = MapRenderer::default();
    let mut store = MemoryStore::new();
    let map = renderer.create_blank_map(&mut store);
    let svg = renderer.render_map_svg(&map);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let id = doc.root_element().attribute("id").unwrap();
    assert!(id.chars().next().unwrap().is_ascii_alphabetic());
    assert!(id.ends_with(&map.id));
}
