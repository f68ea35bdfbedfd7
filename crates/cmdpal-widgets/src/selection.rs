#![forbid(unsafe_code)]

//! Selection over filtered positions, with wrap-around navigation.
//!
//! | From      | `move_next`                      | `move_prev`                        |
//! |-----------|----------------------------------|------------------------------------|
//! | `None`    | `At(0)`                          | `At(len - 1)`                      |
//! | `At(i)`   | `At(i + 1)`, or `At(0)` at end   | `At(i - 1)`, or `At(len - 1)` at 0 |
//!
//! With `len == 0` every transition leaves the selection at `None`, and
//! any filter change resets it to `None`.

/// Selected filtered position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    None,
    /// Filtered position `i`, with `i < len`.
    At(usize),
}

impl Selection {
    /// Selected position, if any.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::At(i) => Some(i),
        }
    }
}

/// Selection state machine over a list of `len` filtered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionController {
    state: Selection,
    len: usize,
}

impl SelectionController {
    /// No selection over an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Selection::None,
            len: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> Selection {
        self.state
    }

    /// Length of the list being navigated.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Select the next position, wrapping to the first.
    pub fn move_next(&mut self) {
        self.state = match self.state {
            _ if self.len == 0 => Selection::None,
            Selection::None => Selection::At(0),
            Selection::At(i) if i + 1 < self.len => Selection::At(i + 1),
            Selection::At(_) => Selection::At(0),
        };
    }

    /// Select the previous position, wrapping to the last.
    pub fn move_prev(&mut self) {
        self.state = match self.state {
            _ if self.len == 0 => Selection::None,
            Selection::None => Selection::At(self.len - 1),
            Selection::At(i) if i > 0 && i <= self.len => Selection::At(i - 1),
            Selection::At(_) => Selection::At(self.len - 1),
        };
    }

    /// The filtered list changed to `len` entries: drop the selection.
    pub fn on_filter_changed(&mut self, len: usize) {
        self.len = len;
        self.state = Selection::None;
    }

    /// The selected position, if any. Commits nothing in `None`.
    #[must_use]
    pub fn commit(&self) -> Option<usize> {
        match self.state {
            Selection::At(i) if i < self.len => Some(i),
            _ => None,
        }
    }

    /// Back to no selection over an empty list.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
