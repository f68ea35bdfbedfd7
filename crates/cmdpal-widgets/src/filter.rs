#![forbid(unsafe_code)]

//! Filter engine: query + source snapshot + scope -> filtered mapping.
//!
//! Matching is a case-insensitive substring test against an entry's text,
//! with ASCII case folding. The empty query matches every in-scope entry.
//! The mapping lists source indices in source order; nothing is re-ranked.
//!
//! The mapping is a snapshot. It is recomputed in full whenever the query
//! changes and never tracks later changes to the source.

use crate::source::{ItemSource, Scope};

/// Case-insensitive (ASCII) substring test. An empty `query` always matches.
#[must_use]
pub fn matches(text: &str, query: &str) -> bool {
    let (haystack, needle) = (text.as_bytes(), query.as_bytes());
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    // UTF-8 is self-synchronizing, so a byte-level match of a whole UTF-8
    // needle always starts on a character boundary.
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

/// Source indices of the entries that match `query`, in source order.
///
/// `scope` restricts the result to descendants of the scope root. A scope
/// the source does not accept (flat source, unknown root) is ignored.
#[must_use]
pub fn apply(query: &str, source: &dyn ItemSource, scope: Option<Scope>) -> Vec<usize> {
    let scope = scope.and_then(|s| source.resolve_scope(s));
    source
        .enumerate()
        .filter(|entry| scope.is_none_or(|s| source.in_scope(entry.position, s)))
        .filter(|entry| matches(&entry.text, query))
        .map(|entry| entry.position)
        .collect()
}

/// Current query and the mapping it produced.
///
/// # Invariants
///
/// - `mapping` equals `apply(query, source, scope)` for the source it was
///   last computed against.
/// - `mapping` is strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    scope: Option<Scope>,
    mapping: Vec<usize>,
}

impl FilterState {
    /// Empty query, no scope, empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for `source` and `scope`: empty query, full scoped mapping.
    pub fn reset(&mut self, source: Option<&dyn ItemSource>, scope: Option<Scope>) {
        self.scope = scope;
        self.set_query(String::new(), source);
    }

    /// Replace the query and recompute the mapping.
    pub fn set_query(&mut self, query: impl Into<String>, source: Option<&dyn ItemSource>) {
        self.query = query.into();
        self.recompute(source);
    }

    /// Recompute the mapping for the current query.
    pub fn recompute(&mut self, source: Option<&dyn ItemSource>) {
        self.mapping = match source {
            Some(source) => apply(&self.query, source, self.scope),
            None => Vec::new(),
        };
    }

    /// Drop query, scope, and mapping.
    pub fn clear(&mut self) {
        self.query.clear();
        self.scope = None;
        self.mapping.clear();
    }

    /// Current query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Scope the mapping was computed under.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    /// Filtered source indices.
    #[must_use]
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Number of filtered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Source index shown at filtered position `pos`.
    #[must_use]
    pub fn to_source(&self, pos: usize) -> Option<usize> {
        self.mapping.get(pos).copied()
    }

    /// Filtered position of source index `index`, if it passed the filter.
    #[must_use]
    pub fn from_source(&self, index: usize) -> Option<usize> {
        self.mapping.binary_search(&index).ok()
    }
}
