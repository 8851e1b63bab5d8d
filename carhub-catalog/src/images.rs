use std::collections::HashSet;

use carhub_core::ListingId;
use parking_lot::Mutex;

/// Which listings on screen have a fully loaded primary image.
///
/// Owned by one view; the UI shows a placeholder until `is_loaded` is true.
#[derive(Debug, Default)]
pub struct ImageReadinessTracker {
    loaded: Mutex<HashSet<ListingId>>,
}

impl ImageReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id`'s primary image finished loading. Idempotent.
    pub fn mark_loaded(&self, id: &ListingId) {
        self.loaded.lock().insert(id.clone());
    }

    pub fn is_loaded(&self, id: &ListingId) -> bool {
        self.loaded.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.loaded.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.lock().is_empty()
    }

    /// Forget everything; used when the list is wholly replaced or the view
    /// goes away.
    pub fn clear(&self) {
        self.loaded.lock().clear();
    }

    /// Drop entries for items no longer displayed.
    pub fn retain_only<'a>(&self, displayed: impl IntoIterator<Item = &'a ListingId>) {
        let keep: HashSet<&ListingId> = displayed.into_iter().collect();
        self.loaded.lock().retain(|id| keep.contains(id));
    }
}
