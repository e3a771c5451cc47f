#![forbid(unsafe_code)]

//! `folio` turns book highlights and hand-edited outlines into laid-out, rendered mind maps.
//!
//! The parser, models, generation and storage come from `folio-core` and are re-exported here.
//!
//! # Features
//!
//! - `render` (default): layout + SVG rendering (`folio::render`) and the editor session
//!   (`folio::editor`)
//! - `raster`: PNG output via pure-Rust SVG rasterization (`folio::render::raster`)

pub use folio_core::*;

#[cfg(feature = "render")]
pub mod editor;

#[cfg(feature = "render")]
pub mod render {
    use chrono::Utc;
    use folio_core::config::{FolioConfig, LayoutConfig};
    use folio_core::storage::{Backup, Storage};
    use folio_core::{MindMap, OutlineNode};

    pub use folio_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use folio_render::{
        Bounds, LayoutOptions, MindMapLayout, Palette, Point, Scene, SvgRenderOptions,
        ViewController, ViewState, ViewTransform, build_scene, layout_outline, render_svg,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum FolioError {
        #[error(transparent)]
        Core(#[from] folio_core::Error),
        #[error(transparent)]
        Render(#[from] folio_render::Error),
    }

    pub type Result<T> = std::result::Result<T, FolioError>;

    /// SVG `id` for a map, so several maps inlined into one page keep distinct filter ids.
    ///
    /// Map ids are hex uuids and often start with a digit, which is not a valid XML name start;
    /// those get a `map-` prefix. Characters outside `[A-Za-z0-9_.-]` become single dashes.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut id = String::with_capacity(raw.len() + 4);
        for ch in raw.trim().chars() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.') {
                id.push(ch);
            } else if !id.is_empty() && !id.ends_with('-') {
                id.push('-');
            }
        }
        let id = id.trim_end_matches('-');
        match id.chars().next() {
            None => "map-untitled".to_string(),
            Some(c) if c.is_ascii_alphabetic() => id.to_string(),
            Some(_) => format!("map-{id}"),
        }
    }

    /// Outline text to tree. Never fails.
    pub fn parse(text: &str) -> OutlineNode {
        folio_core::parse_outline(text)
    }

    pub fn layout_text(
        text: &str,
        config: &LayoutConfig,
        options: &LayoutOptions,
    ) -> MindMapLayout {
        layout_outline(&parse(text), config, options.text_measurer.as_ref())
    }

    /// Parse, layout and SVG in one call.
    pub fn render_svg_text(
        text: &str,
        config: &FolioConfig,
        options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let palette = Palette::from_config(&config.render)?;
        let layout = layout_text(text, &config.layout, options);
        // A parsed outline always has a root, so a scene always exists.
        let scene = build_scene(Some(&layout), &config.render);
        Ok(scene
            .map(|s| render_svg(&s, &palette, svg_options))
            .unwrap_or_default())
    }

    /// Counts of records written by [`MapRenderer::import_backup`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ImportSummary {
        pub books: usize,
        pub mindmaps: usize,
    }

    /// Bundles config, measurement and SVG options so callers do not thread them through every
    /// call. All work is CPU-bound and synchronous.
    #[derive(Debug, Clone)]
    pub struct MapRenderer {
        pub config: FolioConfig,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
        palette: Palette,
    }

    impl Default for MapRenderer {
        fn default() -> Self {
            Self {
                config: FolioConfig::default(),
                layout: LayoutOptions::default(),
                svg: SvgRenderOptions::default(),
                palette: Palette::default(),
            }
        }
    }

    impl MapRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Validates the configured palette and derives the text measurer from `config.layout`.
        pub fn with_config(config: FolioConfig) -> Result<Self> {
            let palette = Palette::from_config(&config.render)?;
            Ok(Self {
                layout: LayoutOptions::for_config(&config.layout),
                svg: SvgRenderOptions::default(),
                palette,
                config,
            })
        }

        pub fn with_text_measurer(
            mut self,
            measurer: std::sync::Arc<dyn TextMeasurer + Send + Sync>,
        ) -> Self {
            self.layout.text_measurer = measurer;
            self
        }

        pub fn palette(&self) -> &Palette {
            &self.palette
        }

        pub fn layout_text(&self, text: &str) -> MindMapLayout {
            layout_text(text, &self.config.layout, &self.layout)
        }

        pub fn scene(&self, layout: Option<&MindMapLayout>) -> Option<Scene> {
            build_scene(layout, &self.config.render)
        }

        /// SVG for `layout`, with an optional view transform on the content group. `None` when
        /// there is no layout.
        pub fn render_layout_svg(
            &self,
            layout: Option<&MindMapLayout>,
            view: Option<ViewTransform>,
        ) -> Option<String> {
            let scene = self.scene(layout)?;
            let options = SvgRenderOptions {
                view_transform: view,
                ..self.svg.clone()
            };
            Some(render_svg(&scene, &self.palette, &options))
        }

        pub fn render_svg_text(&self, text: &str) -> String {
            let layout = self.layout_text(text);
            self.render_layout_svg(Some(&layout), None)
                .unwrap_or_default()
        }

        /// Renders a stored map from its outline, with the map id as the SVG id.
        pub fn render_map_svg(&self, map: &MindMap) -> String {
            let layout = self.layout_text(&map.outline);
            let Some(scene) = self.scene(Some(&layout)) else {
                return String::new();
            };
            let options = SvgRenderOptions {
                diagram_id: sanitize_svg_id(&map.id),
                ..self.svg.clone()
            };
            render_svg(&scene, &self.palette, &options)
        }

        /// Re-derives `map.root` from `map.outline`.
        pub fn refresh_root(&self, map: &mut MindMap) {
            map.root = Some(self.layout_text(&map.outline).root);
        }

        /// A controller for a newly opened view, starting from the reset state.
        pub fn view_controller(&self) -> ViewController {
            ViewController::new(self.config.view.clone())
        }

        /// Generates a map from a stored book's highlights, lays it out and saves it.
        pub fn create_map_from_book<S: Storage + ?Sized>(
            &self,
            store: &mut S,
            book_id: &str,
        ) -> Result<MindMap> {
            let book = store
                .get_book(book_id)
                .ok_or_else(|| folio_core::Error::BookNotFound {
                    id: book_id.to_string(),
                })?;
            let mut map =
                folio_core::new_map_from_book(&book, &self.config.generate, Utc::now())?;
            self.refresh_root(&mut map);
            store.save_mind_map(map.clone());
            tracing::debug!(map = %map.id, book = %book.id, "created mind map from book");
            Ok(map)
        }

        pub fn create_blank_map<S: Storage + ?Sized>(&self, store: &mut S) -> MindMap {
            let mut map = folio_core::new_blank_map(Utc::now());
            self.refresh_root(&mut map);
            store.save_mind_map(map.clone());
            map
        }

        /// Restores a JSON backup into `store`, re-deriving every map's cached root. Each
        /// section present in the file replaces the matching collection.
        pub fn import_backup<S: Storage + ?Sized>(
            &self,
            store: &mut S,
            json: &str,
        ) -> Result<ImportSummary> {
            let mut backup = Backup::from_json(json)?;
            for map in backup.mindmaps.iter_mut().flatten() {
                self.refresh_root(map);
            }
            let summary = ImportSummary {
                books: backup.book_count(),
                mindmaps: backup.mind_map_count(),
            };
            backup.restore_into(store);
            Ok(summary)
        }
    }

    /// [`MapRenderer::create_map_from_book`] with default settings.
    pub fn create_map_from_book<S: Storage + ?Sized>(
        store: &mut S,
        book_id: &str,
    ) -> Result<MindMap> {
        MapRenderer::default().create_map_from_book(store, book_id)
    }

    /// [`MapRenderer::import_backup`] with default settings.
    pub fn import_backup<S: Storage + ?Sized>(store: &mut S, json: &str) -> Result<ImportSummary> {
        MapRenderer::default().import_backup(store, json)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn sanitize_svg_id_cases() {
            assert_eq!(sanitize_svg_id(""), "map-untitled");
            assert_eq!(sanitize_svg_id("  "), "map-untitled");
            assert_eq!(sanitize_svg_id("abc"), "abc");
            assert_eq!(sanitize_svg_id("a b/c"), "a-b-c");
            assert_eq!(
                sanitize_svg_id("3f2a9c0e1b"),
                "map-3f2a9c0e1b"
            );
            assert_eq!(sanitize_svg_id("---"), "map-untitled");
            assert_eq!(sanitize_svg_id("map"), "map");
            assert_eq!(sanitize_svg_id("-_x"), "map-_x");
            assert_eq!(sanitize_svg_id("é/é"), "map-untitled");
        }

        #[test]
        fn render_svg_text_rejects_bad_palette() {
            let mut config = FolioConfig::default();
            config.render.palette.clear();
            let err = render_svg_text(
                "R",
                &config,
                &LayoutOptions::default(),
                &SvgRenderOptions::default(),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                FolioError::Render(folio_render::Error::EmptyPalette)
            ));
        }

        #[test]
        fn custom_text_measurer_drives_node_widths() {
            let text = "R\n\tabcdefghijkl";
            let default = MapRenderer::default().layout_text(text);
            assert_eq!(default.root.children[0].width, 126.0);

            let wide = MapRenderer::default().with_text_measurer(std::sync::Arc::new(
                DeterministicTextMeasurer::with_char_width(20.0),
            ));
            let layout = wide.layout_text(text);
            assert_eq!(layout.root.children[0].width, 200.0);
            assert_eq!(layout.root.width, 100.0);
        }

        #[test]
        fn refresh_root_matches_a_fresh_layout() {
            let r = MapRenderer::default();
            let mut map = MindMap::blank(Utc::now());
            r.refresh_root(&mut map);
            assert_eq!(map.root, Some(r.layout_text(&map.outline).root));
            assert_eq!(map.root_label(), "Central Topic");
        }
    }
}
