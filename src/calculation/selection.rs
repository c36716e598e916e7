//! Selection tracking for bulk operations.
//!
//! A [`SelectionTracker`] holds positions in a [`RecordView`]. It is scoped to
//! the view's filter and collection revision: when either changes, the
//! positions no longer identify the same records and the selection is dropped.
//! Selected positions resolve to record identifiers through the view, so
//! deleting never depends on matching record fields.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FilterSpec, RecordId, TimeRecord};

use super::RecordView;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectionScope {
    filter: FilterSpec,
    revision: u64,
    len: usize,
}

/// Positions of the current view marked for a bulk action.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{RecordView, SelectionTracker};
/// use overtime_engine::models::{FilterSpec, HolidaySet, TimeRecord};
/// use chrono::NaiveDate;
///
/// let records = vec![
///     TimeRecord::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),
///     TimeRecord::new(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()),
/// ];
/// let view = RecordView::build(&records, FilterSpec::default(), &HolidaySet::default(), 0);
///
/// let mut tracker = SelectionTracker::new();
/// tracker.bind(&view);
/// tracker.toggle(1);
/// assert_eq!(tracker.selected_ids(&view), Some(vec![records[0].id]));
///
/// tracker.select_all_filtered(view.len());
/// assert!(tracker.is_all_filtered_selected());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    scope: Option<SelectionScope>,
    selected: BTreeSet<usize>,
}

impl SelectionTracker {
    /// Creates an unbound, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the tracker's scope is the given view.
    pub fn is_bound_to(&self, view: &RecordView) -> bool {
        self.scope.as_ref().is_some_and(|scope| {
            scope.revision == view.revision() && &scope.filter == view.filter()
        })
    }

    /// Scopes the tracker to a view.
    ///
    /// If the view has a different filter or revision than the current
    /// scope, the selection is cleared. Returns true when that happened to a
    /// non-empty selection.
    pub fn bind(&mut self, view: &RecordView) -> bool {
        if self.is_bound_to(view) {
            return false;
        }
        let dropped = !self.selected.is_empty();
        if dropped {
            debug!(
                dropped = self.selected.len(),
                revision = view.revision(),
                "Selection invalidated by view change"
            );
        }
        self.selected.clear();
        self.scope = Some(SelectionScope {
            filter: view.filter().clone(),
            revision: view.revision(),
            len: view.len(),
        });
        dropped
    }

    /// Drops the selection and the scope.
    pub fn invalidate(&mut self) {
        self.selected.clear();
        self.scope = None;
    }

    fn len_in_scope(&self) -> usize {
        self.scope.as_ref().map_or(0, |scope| scope.len)
    }

    /// Flips one position. Returns whether it is now selected.
    ///
    /// Positions outside the bound view are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.len_in_scope() {
            return false;
        }
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    /// Selects every position of the visible page.
    pub fn select_all_visible(&mut self, page_indices: &[usize]) {
        let len = self.len_in_scope();
        self.selected
            .extend(page_indices.iter().copied().filter(|&i| i < len));
    }

    /// Deselects every position of the visible page.
    pub fn deselect_all_visible(&mut self, page_indices: &[usize]) {
        for index in page_indices {
            self.selected.remove(index);
        }
    }

    /// Selects the first `total_filtered_count` positions of the view.
    pub fn select_all_filtered(&mut self, total_filtered_count: usize) {
        let count = total_filtered_count.min(self.len_in_scope());
        self.selected.extend(0..count);
    }

    /// Deselects everything, keeping the scope.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns true if every position of a non-empty view is selected.
    pub fn is_all_filtered_selected(&self) -> bool {
        let len = self.len_in_scope();
        len > 0 && self.selected.len() == len
    }

    /// Returns true if every position of the page is selected.
    pub fn is_all_visible_selected(&self, page_indices: &[usize]) -> bool {
        !page_indices.is_empty() && page_indices.iter().all(|i| self.selected.contains(i))
    }

    /// Returns true if the position is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected positions, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Number of selected positions.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Identifiers of the selected records, or `None` if the tracker is not
    /// bound to `view`.
    pub fn selected_ids(&self, view: &RecordView) -> Option<Vec<RecordId>> {
        if !self.is_bound_to(view) {
            return None;
        }
        Some(view.ids_at(self.selected.iter().copied()))
    }
}

/// Outcome of removing records from the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPlan {
    /// The collection without the removed records, in collection order.
    pub remaining: Vec<TimeRecord>,
    /// Number of records removed.
    pub removed: usize,
}

/// Computes the collection left after removing the given identifiers.
///
/// The result is meant to be handed to the repository as the new full list.
pub fn plan_deletion(records: &[TimeRecord], ids: &[RecordId]) -> DeletionPlan {
    let ids: HashSet<&RecordId> = ids.iter().collect();
    let remaining: Vec<TimeRecord> = records
        .iter()
        .filter(|record| !ids.contains(&record.id))
        .cloned()
        .collect();
    DeletionPlan {
        removed: records.len() - remaining.len(),
        remaining,
    }
}
