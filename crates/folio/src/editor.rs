//! Interactive editing session for one mind map.
//!
//! Outline edits are debounced: every edit supersedes the pending one, and the pipeline runs
//! at most once per quiet period, when the caller polls after the deadline. The caller owns
//! the clock, so the session has no timers or threads of its own.

use std::time::{Duration, Instant};

use folio_core::MindMap;
use folio_core::outline::{indent_line, outdent_line};
use folio_core::storage::Storage;

use crate::render::{MapRenderer, MindMapLayout, ViewController};

/// A cancellable delay. Each [`Debouncer::schedule`] call returns a new token and invalidates
/// the previous one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
    next_token: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: u64,
    deadline: Instant,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_token: 0,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.next_token += 1;
        if let Some(prev) = self.pending {
            tracing::trace!(superseded = prev.token, by = self.next_token, "debounce reset");
        }
        self.pending = Some(Pending {
            token: self.next_token,
            deadline: now + self.delay,
        });
        self.next_token
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Fires the pending token if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        let p = self.pending?;
        if now < p.deadline {
            return None;
        }
        self.pending = None;
        Some(p.token)
    }

    /// Fires the pending token immediately, regardless of its deadline.
    pub fn flush(&mut self) -> Option<u64> {
        self.pending.take().map(|p| p.token)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// The builder view of one map: outline text, the last rendered layout, and the view state.
#[derive(Debug)]
pub struct MapEditor {
    renderer: MapRenderer,
    map: MindMap,
    layout: Option<MindMapLayout>,
    view: ViewController,
    debouncer: Debouncer,
    render_count: u64,
}

impl MapEditor {
    /// Opens `map` for editing: renders it once and starts from a reset view.
    pub fn open(map: MindMap, renderer: MapRenderer) -> Self {
        let debouncer = Debouncer::from_millis(renderer.config.editor.debounce_ms);
        let view = renderer.view_controller();
        let mut editor = Self {
            renderer,
            map,
            layout: None,
            view,
            debouncer,
            render_count: 0,
        };
        editor.rerender();
        editor
    }

    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn outline(&self) -> &str {
        &self.map.outline
    }

    /// The layout from the last pipeline run. Lags behind the outline while an edit is pending.
    pub fn layout(&self) -> Option<&MindMapLayout> {
        self.layout.as_ref()
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController {
        &mut self.view
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn has_pending_edit(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.map.title = title.into();
    }

    pub fn edit_outline(&mut self, text: impl Into<String>, now: Instant) {
        self.map.set_outline(text);
        self.debouncer.schedule(now);
    }

    /// Tab at `cursor`. Returns the new cursor.
    pub fn indent(&mut self, cursor: usize, now: Instant) -> usize {
        let edit = indent_line(&self.map.outline, cursor);
        self.edit_outline(edit.text, now);
        edit.cursor
    }

    /// Shift+Tab at `cursor`. Returns the new cursor.
    pub fn outdent(&mut self, cursor: usize, now: Instant) -> usize {
        let edit = outdent_line(&self.map.outline, cursor);
        if edit.text != self.map.outline {
            self.edit_outline(edit.text, now);
        }
        edit.cursor
    }

    /// Runs the pipeline if the latest edit's quiet period has elapsed. Returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debouncer.poll(now).is_none() {
            return false;
        }
        self.rerender();
        true
    }

    /// Runs the pipeline now for a pending edit. Returns whether it ran.
    pub fn flush(&mut self) -> bool {
        if self.debouncer.flush().is_none() {
            return false;
        }
        self.rerender();
        true
    }

    /// SVG of the current layout under the current view transform.
    pub fn render_svg(&self) -> Option<String> {
        self.renderer
            .render_layout_svg(self.layout.as_ref(), Some(self.view.current_transform()))
    }

    /// Persists the map. A pending edit is flushed first so the stored root matches the outline.
    pub fn save<S: Storage + ?Sized>(&mut self, store: &mut S) {
        self.flush();
        store.save_mind_map(self.map.clone());
    }

    pub fn into_map(mut self) -> MindMap {
        self.flush();
        self.map
    }

    fn rerender(&mut self) {
        let layout = self.renderer.layout_text(&self.map.outline);
        self.map.root = Some(layout.root.clone());
        self.layout = Some(layout);
        self.render_count += 1;
        tracing::debug!(map = %self.map.id, renders = self.render_count, "re-rendered map");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_core::storage::MemoryStore;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::from_millis(300);
        let first = d.schedule(t0);
        let second = d.schedule(t0 + ms(100));
        assert_ne!(first, second);

        assert_eq!(d.poll(t0 + ms(300)), None);
        assert_eq!(d.poll(t0 + ms(400)), Some(second));
        assert_eq!(d.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn debouncer_flush_and_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::from_millis(300);
        let tok = d.schedule(t0);
        assert_eq!(d.flush(), Some(tok));
        assert_eq!(d.flush(), None);
        d.schedule(t0);
        d.cancel();
        assert!(!d.is_pending());
    }

    #[test]
    fn burst_of_edits_renders_once_with_latest_text() {
        let t0 = Instant::now();
        let mut ed = MapEditor::open(MindMap::blank(Utc::now()), MapRenderer::default());
        assert_eq!(ed.render_count(), 1);

        ed.edit_outline("A", t0);
        ed.edit_outline("A\n\tB", t0 + ms(50));
        ed.edit_outline("A\n\tB\n\tC", t0 + ms(100));
        assert!(ed.map().root.is_none());
        assert!(!ed.poll(t0 + ms(200)));

        let later = ed.debouncer.deadline().unwrap();
        assert!(ed.poll(later));
        assert_eq!(ed.render_count(), 2);
        let root = &ed.layout().unwrap().root;
        assert_eq!(root.label, "A");
        assert_eq!(root.children.len(), 2);
        assert_eq!(ed.map().root.as_ref(), Some(root));
    }

    #[test]
    fn indent_and_outdent_schedule_edits() {
        let t0 = Instant::now();
        let map = MindMap::new("m", "Root\nChild", Utc::now());
        let mut ed = MapEditor::open(map, MapRenderer::default());

        let cursor = ed.indent(6, t0);
        assert_eq!(ed.outline(), "Root\n\tChild");
        assert_eq!(cursor, 7);
        assert!(ed.has_pending_edit());
        assert!(ed.flush());

        let cursor = ed.outdent(7, t0);
        assert_eq!(ed.outline(), "Root\nChild");
        assert_eq!(cursor, 6);

        ed.flush();
        let count = ed.render_count();
        ed.outdent(6, t0);
        assert!(!ed.has_pending_edit());
        assert_eq!(ed.render_count(), count);
    }

    #[test]
    fn save_flushes_pending_edit() {
        let t0 = Instant::now();
        let mut store = MemoryStore::new();
        let mut ed = MapEditor::open(MindMap::blank(Utc::now()), MapRenderer::default());
        ed.edit_outline("Only", t0);
        ed.save(&mut store);

        let saved = store.get_mind_map(&ed.map().id).unwrap();
        assert_eq!(saved.outline, "Only");
        assert_eq!(saved.root.unwrap().label, "Only");
    }

    #[test]
    fn into_map_keeps_title_and_flushes() {
        let t0 = Instant::now();
        let mut ed = MapEditor::open(MindMap::blank(Utc::now()), MapRenderer::default());
        ed.set_title("Reading notes");
        ed.edit_outline("Notes\n\tOne", t0);
        assert!(ed.has_pending_edit());

        let map = ed.into_map();
        assert_eq!(map.title, "Reading notes");
        let root = map.root.unwrap();
        assert_eq!(root.label, "Notes");
        assert_eq!(root.children[0].label, "One");
    }

    #[test]
    fn view_is_independent_of_edits() {
        let t0 = Instant::now();
        let mut ed = MapEditor::open(MindMap::blank(Utc::now()), MapRenderer::default());
        ed.view_mut().zoom_in();
        ed.edit_outline("X", t0);
        ed.flush();
        assert!((ed.view().zoom() - 1.2).abs() < 1e-9);
        let svg = ed.render_svg().unwrap();
        assert!(svg.contains("scale(1.2)"));
    }
}
