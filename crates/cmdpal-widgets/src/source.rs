#![forbid(unsafe_code)]

//! Item sources: the read-only, ordered, optionally hierarchical data a
//! palette filters.
//!
//! # Contract
//!
//! - [`ItemSource::count`] and [`ItemSource::entry_at`] address entries by
//!   source index in `[0, count())`; anything else is
//!   [`SourceError::OutOfRange`].
//! - [`ItemSource::enumerate`] is lazy, restartable, finite, and yields
//!   entries in stable declaration order.
//! - Hierarchical sources report parents through [`ItemSource::parent_of`]
//!   and accept a [`Scope`] restricting enumeration to the descendants of
//!   one entry. Flat sources ignore scopes.
//!
//! The palette never mutates a source; it only reads.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::actions::ActionId;

/// Stable identity of a source, carried back to the host in
/// [`Chosen`](crate::command_palette::Chosen) so it can tell sources apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocate a fresh, process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Opaque icon handle. The host decides how (and whether) to draw it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRef(String);

impl IconRef {
    /// Create an icon reference from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The icon name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// What an entry stands for. Only the host interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// A row of a plain list.
    Row(usize),
    /// A filesystem path.
    Path(PathBuf),
    /// A host command.
    Action(ActionId),
}

/// One pickable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Text shown in the list and matched by the filter.
    pub text: String,
    /// Optional icon.
    pub icon: Option<IconRef>,
    /// Optional shortcut text shown beside the entry.
    pub shortcut: Option<String>,
    /// Host-defined meaning of the entry.
    pub payload: Payload,
    /// Index of this entry in its source.
    pub position: usize,
}

impl Entry {
    /// Create an entry without icon or shortcut.
    pub fn new(position: usize, text: impl Into<String>, payload: Payload) -> Self {
        Self {
            text: text.into(),
            icon: None,
            shortcut: None,
            payload,
            position,
        }
    }

    /// Set the icon (builder).
    #[must_use]
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the shortcut text (builder).
    #[must_use]
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

/// Restriction of a hierarchical source to the descendants of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    root: usize,
}

impl Scope {
    /// Scope rooted at the entry with source index `root`.
    #[must_use]
    pub const fn new(root: usize) -> Self {
        Self { root }
    }

    /// Source index of the scope root.
    #[must_use]
    pub const fn root(self) -> usize {
        self.root
    }
}

/// Source access errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// `index` is outside `[0, len)`.
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "entry index {index} out of range for source of {len}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Lazy iterator over a source's entries.
pub type Entries<'a> = Box<dyn Iterator<Item = &'a Entry> + 'a>;

/// A read-only provider of an ordered [`Entry`] sequence.
pub trait ItemSource {
    /// Stable identity of this source.
    fn source_id(&self) -> SourceId;

    /// Number of entries.
    fn count(&self) -> usize;

    /// Entry at source index `index`.
    fn entry_at(&self, index: usize) -> Result<&Entry, SourceError>;

    /// Enumerate all entries in declaration order.
    ///
    /// Each call starts a fresh pass.
    fn enumerate(&self) -> Entries<'_> {
        Box::new((0..self.count()).filter_map(move |i| self.entry_at(i).ok()))
    }

    /// Whether entries form a tree. Flat sources ignore scopes.
    fn is_hierarchical(&self) -> bool {
        false
    }

    /// Parent of the entry at `index`, for hierarchical sources.
    fn parent_of(&self, index: usize) -> Option<usize> {
        let _ = index;
        None
    }

    /// Validate `scope` against this source.
    ///
    /// Returns `None` when the scope does not apply: the source is flat or
    /// the root is not one of its entries.
    fn resolve_scope(&self, scope: Scope) -> Option<Scope> {
        (self.is_hierarchical() && scope.root() < self.count()).then_some(scope)
    }

    /// Whether the entry at `index` is a strict descendant of the scope root.
    fn in_scope(&self, index: usize, scope: Scope) -> bool {
        // Bounded by `count` so a malformed parent chain cannot loop.
        let mut current = self.parent_of(index);
        for _ in 0..self.count() {
            match current {
                Some(parent) if parent == scope.root() => return true,
                Some(parent) => current = self.parent_of(parent),
                None => return false,
            }
        }
        false
    }
}
