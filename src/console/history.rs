//! Append-only session history of generations.

use crate::api::types::{ImageObject, ImageSettings};
use std::sync::Arc;

/// One completed generation. Immutable once recorded.
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub result: Arc<ImageObject>,
    pub settings: ImageSettings,
}

/// Ordered list of generations for the current session.
///
/// Entries are never removed or reordered, so an index stays valid for the
/// lifetime of the history.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Generation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, generation: Generation) -> usize {
        self.entries.push(generation);
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Generation> {
        self.entries.get(index)
    }

    /// Index of the entry holding exactly this result object (pointer identity).
    pub fn position_of(&self, result: &Arc<ImageObject>) -> Option<usize> {
        self.entries
            .iter()
            .position(|g| Arc::ptr_eq(&g.result, result))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
