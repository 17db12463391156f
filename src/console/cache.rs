//! Query cache for generation results.
//!
//! Owned by the [`Console`](super::Console) and injected at construction so
//! tests and front ends can share or pre-seed results without global state.

use crate::api::types::{ImageConfig, ImageObject};
use std::collections::HashMap;
use std::sync::Arc;

/// Session cache keyed by the full request tuple.
///
/// Entries never go stale within a session.
pub trait QueryCache {
    fn get(&self, key: &ImageConfig) -> Option<Arc<ImageObject>>;

    fn insert(&mut self, key: ImageConfig, result: Arc<ImageObject>);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`QueryCache`].
#[derive(Debug, Default)]
pub struct MemoryQueryCache {
    entries: HashMap<ImageConfig, Arc<ImageObject>>,
}

impl MemoryQueryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryCache for MemoryQueryCache {
    fn get(&self, key: &ImageConfig) -> Option<Arc<ImageObject>> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: ImageConfig, result: Arc<ImageObject>) {
        self.entries.insert(key, result);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
