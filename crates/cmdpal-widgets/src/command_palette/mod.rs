#![forbid(unsafe_code)]

//! Command palette: an incremental-filter, keyboard-driven picker over an
//! [`ItemSource`].
//!
//! The host hands the palette a source (and optionally a scope) when one of
//! its shortcuts fires, feeds it input events while it is open, and receives
//! a single [`Chosen`] event when the user commits a selection.
//!
//! # Usage
//!
//! ```ignore
//! let quotes: Rc<dyn ItemSource> = Rc::new(StringListSource::new(QUOTES));
//! let mut palette = CommandPalette::new().with_metrics(PaletteMetrics::cells());
//! palette.on_chosen(|chosen| println!("picked {}", chosen.index));
//!
//! // Host shortcut:
//! palette.toggle(Rc::clone(&quotes), None);
//!
//! // Event loop:
//! if !palette.handle_event(&event) {
//!     host.handle_event(&event);
//! }
//! ```
//!
//! # Keys
//!
//! | Key           | Effect                                              |
//! |---------------|-----------------------------------------------------|
//! | Esc           | Close, discarding query and selection               |
//! | Up / Down     | Move the selection, wrapping; only with results     |
//! | Enter         | Close and emit [`Chosen`] if something is selected  |
//! | Backspace     | Delete the last grapheme of the query               |
//! | Ctrl+U        | Clear the query                                     |
//! | printable     | Append to the query                                 |

use std::fmt;
use std::rc::Rc;

use cmdpal_core::event::{Event, KeyCode, KeyEvent, Modifiers};
use cmdpal_core::geometry::{Rect, Size};
use cmdpal_core::text::pop_grapheme;

use crate::filter::FilterState;
use crate::layout::{PaletteLayout, PaletteMetrics};
use crate::selection::{Selection, SelectionController};
use crate::source::{Entry, ItemSource, Payload, Scope, SourceId};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The user's final pick, delivered once per commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chosen {
    /// Source the entry came from.
    pub source: SourceId,
    /// Source index of the entry.
    pub index: usize,
    /// The entry's payload, for the host to interpret.
    pub payload: Payload,
}

type ChosenHandler = Box<dyn FnMut(&Chosen)>;

/// One row of the result viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    /// Filtered position of the row.
    pub position: usize,
    /// The entry shown.
    pub entry: &'a Entry,
    /// Whether this row is selected.
    pub selected: bool,
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Overlay picker over a host-supplied source.
///
/// # Invariants
///
/// 1. While hidden, no source is held and query, mapping and selection are
///    empty.
/// 2. The mapping always reflects the current query and scope against the
///    held source; every query edit resets the selection to
///    [`Selection::None`].
/// 3. The result list is visible exactly when the mapping is non-empty.
/// 4. `scroll_offset <= selected < scroll_offset + rows` whenever a row is
///    selected.
pub struct CommandPalette {
    /// Source supplied at activation. Read, never mutated.
    source: Option<Rc<dyn ItemSource>>,
    filter: FilterState,
    selection: SelectionController,
    metrics: PaletteMetrics,
    /// Last known host size.
    host: Option<Size>,
    layout: PaletteLayout,
    /// Overlay position within the host.
    area: Rect,
    /// First filtered position shown in the viewport.
    scroll_offset: usize,
    visible: bool,
    focus_requested: bool,
    on_chosen: Option<ChosenHandler>,
}

impl fmt::Debug for CommandPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPalette")
            .field("source", &self.source_id())
            .field("filter", &self.filter)
            .field("selection", &self.selection)
            .field("layout", &self.layout)
            .field("area", &self.area)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPalette {
    /// A hidden palette with default metrics.
    #[must_use]
    pub fn new() -> Self {
        let metrics = PaletteMetrics::default();
        Self {
            source: None,
            filter: FilterState::new(),
            selection: SelectionController::new(),
            metrics,
            host: None,
            layout: PaletteLayout::compute(0, None, &metrics),
            area: Rect::default(),
            scroll_offset: 0,
            visible: false,
            focus_requested: false,
            on_chosen: None,
        }
    }

    /// Set the geometry constants (builder).
    #[must_use]
    pub fn with_metrics(mut self, metrics: PaletteMetrics) -> Self {
        self.metrics = metrics;
        self.relayout();
        self
    }

    /// Register the handler receiving [`Chosen`] events, replacing any
    /// previous one.
    pub fn on_chosen(&mut self, handler: impl FnMut(&Chosen) + 'static) {
        self.on_chosen = Some(Box::new(handler));
    }

    // --- Lifecycle ---

    /// Open over `source`, optionally restricted to `scope`.
    ///
    /// The query starts empty, every in-scope entry is listed, nothing is
    /// selected, and the palette asks the host for input focus. A scope the
    /// source rejects is dropped.
    pub fn activate(&mut self, source: Rc<dyn ItemSource>, scope: Option<Scope>) {
        let scope = match scope {
            Some(requested) => {
                let resolved = source.resolve_scope(requested);
                if resolved.is_none() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        target: "cmdpal_widgets::command_palette",
                        event = "scope_rejected",
                        source = source.source_id().get(),
                        root = requested.root(),
                        "scope does not apply to source"
                    );
                }
                resolved
            }
            None => None,
        };

        self.filter.reset(Some(source.as_ref()), scope);
        self.source = Some(source);
        self.selection.on_filter_changed(self.filter.len());
        self.scroll_offset = 0;
        self.visible = true;
        self.focus_requested = true;
        self.relayout();

        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "cmdpal_widgets::command_palette",
            event = "activate",
            source = self.source_id().map_or(0, SourceId::get),
            scoped = scope.is_some(),
            results = self.filter.len(),
            "palette activated"
        );
    }

    /// Close: hide the overlay, release the source, discard query and
    /// selection.
    pub fn deactivate(&mut self) {
        #[cfg(feature = "tracing")]
        if self.visible {
            tracing::info!(
                target: "cmdpal_widgets::command_palette",
                event = "deactivate",
                source = self.source_id().map_or(0, SourceId::get),
                "palette deactivated"
            );
        }

        self.visible = false;
        self.source = None;
        self.filter.clear();
        self.selection.reset();
        self.scroll_offset = 0;
        self.focus_requested = false;
        self.relayout();
    }

    /// Close if open, otherwise open over `source`.
    pub fn toggle(&mut self, source: Rc<dyn ItemSource>, scope: Option<Scope>) {
        if self.visible {
            self.deactivate();
        } else {
            self.activate(source, scope);
        }
    }

    // --- Query ---

    /// Replace the query and refilter.
    ///
    /// The selection resets and the viewport returns to the top of the
    /// list, which for a scoped source with an empty query is the first
    /// child of the scope root. Ignored while hidden.
    pub fn on_text_changed(&mut self, query: &str) {
        if !self.visible {
            return;
        }
        self.filter.set_query(query, self.source.as_deref());
        self.after_filter_change();
    }

    /// Empty the query.
    pub fn clear_text(&mut self) {
        self.on_text_changed("");
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String) -> bool) {
        let mut query = self.filter.query().to_owned();
        if edit(&mut query) {
            self.on_text_changed(&query);
        }
    }

    fn after_filter_change(&mut self) {
        self.selection.on_filter_changed(self.filter.len());
        self.scroll_offset = 0;
        self.relayout();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "cmdpal_widgets::command_palette",
            event = "query_changed",
            query_len = self.filter.query().len(),
            results = self.filter.len(),
            "palette query changed"
        );
    }

    // --- Input ---

    /// Handle a canonical input event. Returns `true` if the palette
    /// consumed it.
    ///
    /// Resize events update the layout but are never consumed, so the host
    /// sees them too. Nothing is consumed while hidden.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Resize { width, height } = *event {
            self.on_host_resize(Size::new(width, height));
            return false;
        }
        if !self.visible {
            return false;
        }
        match event {
            Event::Key(key) => match event.as_key_press() {
                Some(_) => self.on_key(key),
                // Releases are swallowed so they do not leak to the host.
                None => true,
            },
            Event::Paste(text) => {
                let text: String = text.chars().filter(|&c| c != '\n' && c != '\r').collect();
                if !text.is_empty() {
                    self.edit_query(|q| {
                        q.push_str(&text);
                        true
                    });
                }
                true
            }
            _ => false,
        }
    }

    /// Handle a key press. Returns `true` if consumed.
    pub fn on_key(&mut self, key: &KeyEvent) -> bool {
        if !self.visible {
            return false;
        }
        match key.code {
            KeyCode::Escape => self.deactivate(),
            KeyCode::Up => {
                if self.layout.list_visible {
                    self.selection.move_prev();
                    self.scroll_to_selection();
                }
            }
            KeyCode::Down => {
                if self.layout.list_visible {
                    self.selection.move_next();
                    self.scroll_to_selection();
                }
            }
            KeyCode::Enter => self.commit(),
            KeyCode::Backspace => self.edit_query(pop_grapheme),
            KeyCode::Char('u') if key.modifiers == Modifiers::CTRL => self.clear_text(),
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => self.edit_query(|q| {
                q.push(c);
                true
            }),
            _ => return false,
        }
        true
    }

    /// Commit the selection: close, then emit [`Chosen`]. A no-op with no
    /// selection; the palette stays open.
    fn commit(&mut self) {
        let Some(pos) = self.selection.commit() else {
            return;
        };
        let Some(index) = self.filter.to_source(pos) else {
            return;
        };
        let Some(source) = self.source.as_deref() else {
            return;
        };
        let Some(entry) = lookup(source, index) else {
            return;
        };
        let chosen = Chosen {
            source: source.source_id(),
            index,
            payload: entry.payload.clone(),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "cmdpal_widgets::command_palette",
            event = "commit",
            source = chosen.source.get(),
            index,
            "palette entry chosen"
        );

        self.deactivate();
        if let Some(handler) = self.on_chosen.as_mut() {
            handler(&chosen);
        }
    }

    /// The host was resized: recompute and reposition. An open palette asks
    /// for focus again.
    pub fn on_host_resize(&mut self, size: Size) {
        self.host = Some(size);
        self.relayout();
        if self.visible {
            self.focus_requested = true;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "cmdpal_widgets::command_palette",
            event = "resize",
            width = size.width,
            height = size.height,
            "palette relaid out"
        );
    }

    /// Take a pending focus request, clearing it.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    fn relayout(&mut self) {
        self.layout = PaletteLayout::compute(
            self.filter.len(),
            self.host.map(|h| h.width),
            &self.metrics,
        );
        self.area = match self.host {
            Some(host) => self.layout.place(host, &self.metrics),
            None => Rect::new(
                0,
                self.metrics.top_offset,
                self.layout.width,
                self.layout.height,
            ),
        };
    }

    fn scroll_to_selection(&mut self) {
        let Some(selected) = self.selection.state().index() else {
            return;
        };
        let rows = usize::from(self.layout.rows.max(1));
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + rows {
            self.scroll_offset = selected + 1 - rows;
        }
    }

    // --- Queries ---

    /// Whether the overlay is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the result list is shown.
    #[must_use]
    pub fn is_list_visible(&self) -> bool {
        self.layout.list_visible
    }

    /// Current query.
    #[must_use]
    pub fn query(&self) -> &str {
        self.filter.query()
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.state()
    }

    /// Number of entries passing the filter.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.filter.len()
    }

    /// Filtered mapping and query.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Identity of the held source, if open.
    #[must_use]
    pub fn source_id(&self) -> Option<SourceId> {
        self.source.as_ref().map(|s| s.source_id())
    }

    /// Whether a source is held.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Scope in effect, if any.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        self.filter.scope()
    }

    /// Geometry constants.
    #[must_use]
    pub fn metrics(&self) -> &PaletteMetrics {
        &self.metrics
    }

    /// Current size and visibility of the overlay.
    #[must_use]
    pub fn layout(&self) -> PaletteLayout {
        self.layout
    }

    /// Overlay rectangle within the host.
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// First filtered position in the viewport.
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// The selected entry, if any.
    #[must_use]
    pub fn selected_entry(&self) -> Option<&Entry> {
        let pos = self.selection.state().index()?;
        let index = self.filter.to_source(pos)?;
        lookup(self.source.as_deref()?, index)
    }

    /// Rows currently in the viewport, top to bottom.
    pub fn visible_rows(&self) -> impl Iterator<Item = VisibleRow<'_>> + '_ {
        let source = self.source.as_deref();
        let selected = self.selection.state().index();
        let mapping = self.filter.mapping();
        let end = self
            .scroll_offset
            .saturating_add(usize::from(self.layout.rows))
            .min(mapping.len());
        let start = self.scroll_offset.min(end);
        mapping[start..end]
            .iter()
            .enumerate()
            .filter_map(move |(i, &index)| {
                let position = start + i;
                Some(VisibleRow {
                    position,
                    entry: lookup(source?, index)?,
                    selected: selected == Some(position),
                })
            })
    }
}

/// Resolve a mapped index. A miss means the mapping went stale.
fn lookup(source: &dyn ItemSource, index: usize) -> Option<&Entry> {
    let entry = source.entry_at(index);
    debug_assert!(
        entry.is_ok(),
        "filtered mapping out of sync with source: {:?}",
        entry.as_ref().err()
    );
    entry.ok()
}
