//! Status aggregation and presentation labels.

use serde::Serialize;

use crate::record::EmployeeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Active,
    OnLeave,
    Terminated,
    Other,
}

impl StatusCategory {
    pub fn classify(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "active" => StatusCategory::Active,
            "on leave" => StatusCategory::OnLeave,
            "terminated" => StatusCategory::Terminated,
            _ => StatusCategory::Other,
        }
    }
}

/// Display label for a status cell.
///
/// Known categories get their canonical spelling; anything else is lowercased
/// with the first character uppercased ("ON CONTRACT" -> "On contract").
pub fn status_label(status: &str) -> String {
    match StatusCategory::classify(status) {
        StatusCategory::Active => "Active".to_string(),
        StatusCategory::OnLeave => "On Leave".to_string(),
        StatusCategory::Terminated => "Terminated".to_string(),
        StatusCategory::Other => {
            let lowered = status.to_lowercase();
            let mut chars = lowered.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub active: usize,
    pub leave: usize,
    pub terminated: usize,
    pub total: usize,
}

impl StatusCounts {
    /// Statuses outside the three known categories only count toward `total`.
    pub fn unclassified(&self) -> usize {
        self.total - self.active - self.leave - self.terminated
    }
}

pub fn aggregate_status(records: &[EmployeeRecord]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: records.len(),
        ..StatusCounts::default()
    };
    for record in records {
        match StatusCategory::classify(&record.status) {
            StatusCategory::Active => counts.active += 1,
            StatusCategory::OnLeave => counts.leave += 1,
            StatusCategory::Terminated => counts.terminated += 1,
            StatusCategory::Other => {}
        }
    }
    counts
}
