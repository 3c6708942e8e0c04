//! Breadcrumb history of prior views.

use crate::{DrillDownError, NavigationState};

/// Ordered snapshots of the views that led to the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<NavigationState>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: NavigationState) {
        self.entries.push(state);
    }

    /// Remove `entries[index..]` and return the entry at `index`.
    pub fn truncate_to(&mut self, index: usize) -> Result<NavigationState, DrillDownError> {
        if index >= self.entries.len() {
            return Err(DrillDownError::HistoryIndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let mut removed = self.entries.split_off(index);
        Ok(removed.swap_remove(0))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NavigationState> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&NavigationState> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NavigationState> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[NavigationState] {
        &self.entries
    }
}
