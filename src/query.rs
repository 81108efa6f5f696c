//! Query Engine: sort, filter, search and selection over a record slice.
//!
//! [`QueryState`] is a plain value. Every operation consumes the current state
//! and returns the next one; evaluating the visible set borrows the records
//! and never mutates them.
//!
//! The visible sequence is computed as sort, then filter, then search. Sorting
//! the whole collection first keeps a record's relative position stable while
//! filters are toggled.

use std::{cmp::Ordering, collections::BTreeSet, fmt};

use serde::Serialize;

use crate::record::{CanonicalField, EmployeeRecord};

/// Status filter value that disables status filtering.
pub const ALL_STATUS: &str = "All Status";
/// Role filter value that disables role filtering.
pub const ALL_ROLE: &str = "All Role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: CanonicalField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub sort: Option<SortKey>,
    pub search: String,
    pub status_filter: String,
    pub role_filter: String,
    pub selected: BTreeSet<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            sort: None,
            search: String::new(),
            status_filter: ALL_STATUS.to_string(),
            role_filter: ALL_ROLE.to_string(),
            selected: BTreeSet::new(),
        }
    }
}

impl QueryState {
    /// Advances the sort cycle: ascending, descending, unsorted.
    ///
    /// Choosing a different field always restarts at ascending.
    #[must_use]
    pub fn toggle_sort(mut self, field: CanonicalField) -> Self {
        self.sort = match self.sort {
            Some(SortKey {
                field: current,
                direction: SortDirection::Asc,
            }) if current == field => Some(SortKey {
                field,
                direction: SortDirection::Desc,
            }),
            Some(SortKey {
                field: current,
                direction: SortDirection::Desc,
            }) if current == field => None,
            _ => Some(SortKey {
                field,
                direction: SortDirection::Asc,
            }),
        };
        self
    }

    #[must_use]
    pub fn with_filters(mut self, status: impl Into<String>, role: impl Into<String>) -> Self {
        self.status_filter = status.into();
        self.role_filter = role.into();
        self
    }

    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Checking selects exactly the visible ids; unchecking clears everything.
    #[must_use]
    pub fn select_all(mut self, records: &[EmployeeRecord], checked: bool) -> Self {
        self.selected = if checked {
            self.visible(records)
                .into_iter()
                .map(|record| record.id.clone())
                .collect()
        } else {
            BTreeSet::new()
        };
        self
    }

    #[must_use]
    pub fn select_row(mut self, id: &str, checked: bool) -> Self {
        if checked {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
        self
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// The whole collection in current sort order.
    pub fn sorted<'a>(&self, records: &'a [EmployeeRecord]) -> Vec<&'a EmployeeRecord> {
        let mut rows = records.iter().collect::<Vec<_>>();
        if let Some(key) = self.sort {
            rows.sort_by(|left, right| compare_field(left, right, key));
        }
        rows
    }

    pub fn passes_filters(&self, record: &EmployeeRecord) -> bool {
        filter_accepts(&self.status_filter, ALL_STATUS, &record.status)
            && filter_accepts(&self.role_filter, ALL_ROLE, &record.role)
    }

    pub fn matches_search(&self, record: &EmployeeRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        record
            .values()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }

    pub fn visible<'a>(&self, records: &'a [EmployeeRecord]) -> Vec<&'a EmployeeRecord> {
        self.sorted(records)
            .into_iter()
            .filter(|record| self.passes_filters(record))
            .filter(|record| self.matches_search(record))
            .collect()
    }

    /// Selected records that the current filter and search leave on screen.
    pub fn visible_selected_count(&self, records: &[EmployeeRecord]) -> usize {
        self.visible(records)
            .iter()
            .filter(|record| self.is_selected(&record.id))
            .count()
    }

    /// Header checkbox state: something is visible and all of it is selected.
    pub fn all_visible_selected(&self, records: &[EmployeeRecord]) -> bool {
        self.selects_every(&self.visible(records))
    }

    /// Header checkbox state for a visible set the caller already holds.
    pub fn selects_every(&self, visible: &[&EmployeeRecord]) -> bool {
        !visible.is_empty() && visible.iter().all(|record| self.is_selected(&record.id))
    }
}

fn compare_field(left: &EmployeeRecord, right: &EmployeeRecord, key: SortKey) -> Ordering {
    let ordering = left.get(key.field).cmp(right.get(key.field));
    if key.direction.is_ascending() {
        ordering
    } else {
        ordering.reverse()
    }
}

fn filter_accepts(filter: &str, sentinel: &str, value: &str) -> bool {
    filter == sentinel || value.to_lowercase() == filter.to_lowercase()
}
