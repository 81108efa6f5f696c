//! Record Store: the current collection plus its [`QueryState`].
//!
//! A successful import replaces the collection wholesale and resets the query
//! state. A failed import leaves both untouched.

use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::{
    error::DecodeError,
    import::{self, ImportPayload},
    query::{QueryState, SortKey},
    record::{CanonicalField, EmployeeRecord},
    status::{StatusCounts, aggregate_status},
};

/// Distinct values offered by the status and role filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub roles: Vec<String>,
}

impl FilterOptions {
    /// First-appearance order; distinctness is exact (case-sensitive).
    pub fn from_records(records: &[EmployeeRecord]) -> Self {
        Self {
            statuses: records
                .iter()
                .map(|record| record.status.clone())
                .unique()
                .collect(),
            roles: records
                .iter()
                .map(|record| record.role.clone())
                .unique()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibleRow {
    pub selected: bool,
    #[serde(flatten)]
    pub record: EmployeeRecord,
}

/// Serializable view of the store for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct QuerySnapshot {
    pub rows: Vec<VisibleRow>,
    pub sort: Option<SortKey>,
    pub selected: Vec<String>,
    pub visible_selected: usize,
    pub all_visible_selected: bool,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<EmployeeRecord>,
    state: QueryState,
}

impl RecordStore {
    pub fn new(records: Vec<EmployeeRecord>) -> Self {
        Self {
            records,
            state: QueryState::default(),
        }
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swaps in a new collection and starts over with a fresh query state.
    pub fn replace(&mut self, records: Vec<EmployeeRecord>) {
        info!(
            "Replacing {} record(s) with {} imported record(s)",
            self.records.len(),
            records.len()
        );
        self.records = records;
        self.state = QueryState::default();
    }

    /// Decodes and maps `payload`; the collection changes only on success.
    pub fn import(&mut self, payload: &ImportPayload) -> Result<usize, DecodeError> {
        let records = import::import_payload(payload)?;
        let count = records.len();
        self.replace(records);
        Ok(count)
    }

    pub fn sort(&mut self, field: CanonicalField) -> Option<SortKey> {
        self.transition(|state| state.toggle_sort(field));
        debug!("Sort state is now {:?}", self.state.sort);
        self.state.sort
    }

    pub fn filter(&mut self, status: &str, role: &str) {
        self.transition(|state| state.with_filters(status, role));
    }

    pub fn search(&mut self, term: &str) {
        self.transition(|state| state.with_search(term));
    }

    pub fn select_all(&mut self, checked: bool) {
        let records = &self.records;
        let state = std::mem::take(&mut self.state);
        self.state = state.select_all(records, checked);
    }

    pub fn select_row(&mut self, id: &str, checked: bool) {
        self.transition(|state| state.select_row(id, checked));
    }

    pub fn visible(&self) -> Vec<&EmployeeRecord> {
        self.state.visible(&self.records)
    }

    pub fn status_counts(&self) -> StatusCounts {
        aggregate_status(&self.records)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        let visible = self.visible();
        let all_visible_selected = self.state.selects_every(&visible);
        let rows = visible
            .into_iter()
            .map(|record| VisibleRow {
                selected: self.state.is_selected(&record.id),
                record: record.clone(),
            })
            .collect::<Vec<_>>();
        let visible_selected = rows.iter().filter(|row| row.selected).count();
        QuerySnapshot {
            rows,
            sort: self.state.sort,
            selected: self.state.selected.iter().cloned().collect(),
            visible_selected,
            all_visible_selected,
            total: self.records.len(),
        }
    }

    fn transition(&mut self, step: impl FnOnce(QueryState) -> QueryState) {
        let state = std::mem::take(&mut self.state);
        self.state = step(state);
    }
}
