#![forbid(unsafe_code)]

//! Flat list of strings.

use crate::source::{Entries, Entry, ItemSource, Payload, SourceError, SourceId};

/// A flat source over a fixed list of strings. The payload of each entry is
/// its row.
#[derive(Debug, Clone)]
pub struct StringListSource {
    id: SourceId,
    entries: Vec<Entry>,
}

impl StringListSource {
    /// Build a source from strings, keeping their order.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(row, text)| Entry::new(row, text, Payload::Row(row)))
            .collect();
        Self {
            id: SourceId::next(),
            entries,
        }
    }

    /// Text of `row`, if present.
    #[must_use]
    pub fn text(&self, row: usize) -> Option<&str> {
        self.entries.get(row).map(|e| e.text.as_str())
    }
}

impl ItemSource for StringListSource {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn count(&self) -> usize {
        self.entries.len()
    }

    fn entry_at(&self, index: usize) -> Result<&Entry, SourceError> {
        self.entries.get(index).ok_or(SourceError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    fn enumerate(&self) -> Entries<'_> {
        Box::new(self.entries.iter())
    }
}
