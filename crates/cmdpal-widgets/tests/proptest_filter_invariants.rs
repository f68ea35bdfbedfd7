//! Property-based invariant tests for filtering, selection, and layout.
//!
//! 1. The filtered mapping is exactly the source entries whose text contains
//!    the query (ASCII case-insensitively), in source order.
//! 2. Filtering is idempotent for an unchanged source and query.
//! 3. `move_next` applied `len` times is a full cycle.
//! 4. `move_prev` then `move_next` (and the reverse) is the identity when
//!    `len > 1`.
//! 5. Any query edit resets the selection to `None`.
//! 6. Enter with no selection emits nothing and keeps the palette open.
//! 7. The list is visible exactly when something matched, and the height is
//!    `header + min(len, max_rows) * row` when it is.
//! 8. The selected row is always inside the viewport.

use std::cell::Cell;
use std::rc::Rc;

use cmdpal_core::event::{Event, KeyCode, KeyEvent};
use cmdpal_widgets::command_palette::CommandPalette;
use cmdpal_widgets::filter::{FilterState, apply};
use cmdpal_widgets::layout::{PaletteLayout, PaletteMetrics};
use cmdpal_widgets::selection::{Selection, SelectionController};
use cmdpal_widgets::source::ItemSource;
use cmdpal_widgets::sources::StringListSource;
use proptest::prelude::*;

fn texts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z ]{0,12}", 0..40)
}

fn query() -> impl Strategy<Value = String> {
    "[a-zA-Z]{0,3}"
}

fn contains_ignore_case(text: &str, query: &str) -> bool {
    text.to_ascii_lowercase()
        .contains(&query.to_ascii_lowercase())
}

fn selection_at(len: usize, i: usize) -> SelectionController {
    let mut s = SelectionController::new();
    s.on_filter_changed(len);
    for _ in 0..=i {
        s.move_next();
    }
    s
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

proptest! {
    #[test]
    fn mapping_is_ordered_substring_matches(items in texts(), q in query()) {
        let source = StringListSource::new(items.clone());
        let expected: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, t)| contains_ignore_case(t, &q))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(apply(&q, &source, None), expected);
    }

    #[test]
    fn apply_is_idempotent(items in texts(), q in query()) {
        let source = StringListSource::new(items);
        let mut state = FilterState::new();
        state.set_query(q.clone(), Some(&source));
        let first = state.mapping().to_vec();
        state.recompute(Some(&source));
        prop_assert_eq!(state.mapping(), first.as_slice());
        prop_assert_eq!(apply(&q, &source, None), first);
    }

    #[test]
    fn from_source_inverts_to_source(items in texts(), q in query()) {
        let source = StringListSource::new(items);
        let mut state = FilterState::new();
        state.set_query(q, Some(&source));
        for pos in 0..state.len() {
            let index = state.to_source(pos).unwrap();
            prop_assert_eq!(state.from_source(index), Some(pos));
        }
    }

    #[test]
    fn move_next_len_times_is_a_cycle(len in 1usize..50, start in 0usize..50) {
        let start = start % len;
        let mut s = selection_at(len, start);
        for _ in 0..len {
            s.move_next();
        }
        prop_assert_eq!(s.state(), Selection::At(start));
    }

    #[test]
    fn prev_next_round_trip(len in 2usize..50, start in 0usize..50) {
        let start = start % len;
        let mut s = selection_at(len, start);
        s.move_prev();
        s.move_next();
        prop_assert_eq!(s.state(), Selection::At(start));
        s.move_next();
        s.move_prev();
        prop_assert_eq!(s.state(), Selection::At(start));
    }

    #[test]
    fn query_edit_resets_selection(items in texts(), downs in 0usize..10, c in "[a-z]") {
        let source: Rc<dyn ItemSource> = Rc::new(StringListSource::new(items));
        let mut palette = CommandPalette::new();
        palette.activate(source, None);
        for _ in 0..downs {
            palette.handle_event(&press(KeyCode::Down));
        }
        let ch = c.chars().next().unwrap();
        palette.handle_event(&press(KeyCode::Char(ch)));
        prop_assert_eq!(palette.selection(), Selection::None);
    }

    #[test]
    fn enter_without_selection_is_inert(items in texts(), q in query()) {
        let source: Rc<dyn ItemSource> = Rc::new(StringListSource::new(items));
        let mut palette = CommandPalette::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        palette.on_chosen(move |_| flag.set(true));
        palette.activate(source, None);
        palette.on_text_changed(&q);
        palette.handle_event(&press(KeyCode::Enter));
        prop_assert!(!fired.get());
        prop_assert!(palette.is_visible());
    }

    #[test]
    fn visibility_tracks_result_count(len in 0usize..2_000, width in proptest::option::of(0u16..2_000)) {
        let m = PaletteMetrics::default();
        let layout = PaletteLayout::compute(len, width, &m);
        prop_assert_eq!(layout.list_visible, len > 0);
        let rows = len.min(usize::from(m.max_rows)) as u16;
        prop_assert_eq!(layout.height, m.header_height + rows * m.row_height);
        prop_assert!(layout.width <= m.preferred_width);
    }

    #[test]
    fn selected_row_stays_in_viewport(n in 1usize..60, moves in prop::collection::vec(any::<bool>(), 1..80)) {
        let source: Rc<dyn ItemSource> =
            Rc::new(StringListSource::new((0..n).map(|i| format!("row {i}"))));
        let mut palette = CommandPalette::new();
        palette.activate(source, None);
        for down in moves {
            palette.handle_event(&press(if down { KeyCode::Down } else { KeyCode::Up }));
            let selected = palette.visible_rows().filter(|r| r.selected).count();
            prop_assert_eq!(selected, 1);
        }
    }
}
