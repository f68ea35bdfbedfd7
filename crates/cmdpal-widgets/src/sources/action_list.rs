#![forbid(unsafe_code)]

//! Host commands as palette entries.

use crate::actions::{ActionGraph, ActionId, aggregate};
use crate::source::{Entries, Entry, ItemSource, Payload, SourceError, SourceId};

/// A flat source of actions: label as text, key binding as shortcut text,
/// the action's icon, and the [`ActionId`] as payload.
#[derive(Debug, Clone)]
pub struct ActionListSource {
    id: SourceId,
    entries: Vec<Entry>,
}

impl ActionListSource {
    /// Build a source from `ids`, in order. Ids unknown to `graph` are dropped.
    #[must_use]
    pub fn new(graph: &ActionGraph, ids: &[ActionId]) -> Self {
        let entries = ids
            .iter()
            .filter_map(|&id| graph.get(id).map(|action| (id, action)))
            .enumerate()
            .map(|(position, (id, action))| Entry {
                text: action.label.clone(),
                icon: action.icon.clone(),
                shortcut: action.shortcut.map(|s| s.to_string()),
                payload: Payload::Action(id),
                position,
            })
            .collect();
        Self {
            id: SourceId::next(),
            entries,
        }
    }

    /// Aggregate `graph` and build a source over the result.
    #[must_use]
    pub fn from_graph(graph: &ActionGraph) -> Self {
        Self::new(graph, &aggregate(graph))
    }

    /// Action at `index`, if present.
    #[must_use]
    pub fn action_id(&self, index: usize) -> Option<ActionId> {
        match self.entries.get(index)?.payload {
            Payload::Action(id) => Some(id),
            _ => None,
        }
    }
}

impl ItemSource for ActionListSource {
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
