//! Filtered record views and pagination.
//!
//! A [`RecordView`] is the ordered result of the filter engine for one
//! [`FilterSpec`] at one repository revision. Positions in the view are what
//! listings, selections and deletions refer to.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::models::{FilterSpec, HolidaySet, RecordId, TimeRecord};

use super::apply_filter;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// The filtered, date-sorted view of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    filter: FilterSpec,
    revision: u64,
    records: Vec<TimeRecord>,
}

impl RecordView {
    /// Builds the view of `records` under `filter`.
    ///
    /// `revision` identifies the state of the collection the view was built
    /// from; a selection made against this view is only valid while the
    /// collection stays at that revision.
    pub fn build(
        records: &[TimeRecord],
        filter: FilterSpec,
        holidays: &HolidaySet,
        revision: u64,
    ) -> Self {
        let records = apply_filter(records, &filter, holidays);
        Self {
            filter,
            revision,
            records,
        }
    }

    /// The filter the view was built with.
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The collection revision the view was built from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The records in view order.
    pub fn records(&self) -> &[TimeRecord] {
        &self.records
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing matched the filter.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record at a view position.
    pub fn get(&self, index: usize) -> Option<&TimeRecord> {
        self.records.get(index)
    }

    /// The records on one page.
    pub fn page(&self, page: Page) -> &[TimeRecord] {
        &self.records[page.range(self.len())]
    }

    /// Identifiers of the records at the given positions. Out-of-range
    /// positions are skipped.
    pub fn ids_at<I>(&self, indices: I) -> Vec<RecordId>
    where
        I: IntoIterator<Item = usize>,
    {
        indices
            .into_iter()
            .filter_map(|index| self.records.get(index).map(|r| r.id))
            .collect()
    }
}

/// A 1-based page of a view.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::Page;
///
/// let page = Page::new(2, 20);
/// assert_eq!(page.range(45), 20..40);
/// assert_eq!(Page::total_pages(45, 20), 3);
/// assert_eq!(Page::new(3, 20).indices(45), (40..45).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1.
    pub number: usize,
    /// Records per page.
    pub per_page: usize,
}

impl Page {
    /// Creates a page. Zero values are raised to 1.
    pub fn new(number: usize, per_page: usize) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    /// The first page with the default size.
    pub fn first() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }

    /// View positions covered by this page, clamped to `total`.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.number - 1).saturating_mul(self.per_page).min(total);
        let end = start.saturating_add(self.per_page).min(total);
        start..end
    }

    /// View positions covered by this page as a list.
    pub fn indices(&self, total: usize) -> Vec<usize> {
        self.range(total).collect()
    }

    /// Number of pages needed for `total` records.
    pub fn total_pages(total: usize, per_page: usize) -> usize {
        total.div_ceil(per_page.max(1))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first()
    }
}
