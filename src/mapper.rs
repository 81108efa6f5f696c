//! Row Mapper: positional cells to [`EmployeeRecord`]s.
//!
//! Total over every row shape. Short rows leave fields empty, extra cells and
//! unrecognized columns are dropped, and when two columns resolve to the same
//! field the right-most one wins.

use crate::{
    headers::{HeaderMapping, HeaderSlot},
    record::EmployeeRecord,
};

pub fn map_row<S: AsRef<str>>(mapping: &HeaderMapping, row: &[S]) -> EmployeeRecord {
    let mut record = EmployeeRecord::default();
    for (idx, slot) in mapping.iter().enumerate() {
        let HeaderSlot::Canonical(field) = slot else {
            continue;
        };
        let value = row.get(idx).map(|cell| cell.as_ref()).unwrap_or("");
        record.set(*field, value.to_string());
    }
    record
}

pub fn map_rows<S: AsRef<str>>(mapping: &HeaderMapping, rows: &[Vec<S>]) -> Vec<EmployeeRecord> {
    rows.iter().map(|row| map_row(mapping, row)).collect()
}
