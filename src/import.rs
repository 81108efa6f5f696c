//! Import pipeline: decode, canonicalize headers, map rows.
//!
//! Decoding is the only fallible step. Once a [`RawTable`] exists every later
//! stage is total, so an import either yields the full collection or fails
//! without producing anything.

use std::{
    path::Path,
    thread::{self, JoinHandle},
};

use log::{debug, info};

use crate::{
    error::DecodeError,
    headers::{HeaderMapping, canonicalize_headers},
    mapper::map_rows,
    reader::{RawTable, ReaderOptions, TabularFormat, read_table},
    record::EmployeeRecord,
};

#[derive(Debug, Clone)]
pub struct ImportPayload {
    pub bytes: Vec<u8>,
    pub format: TabularFormat,
    pub options: ReaderOptions,
}

impl ImportPayload {
    pub fn new(bytes: Vec<u8>, format: TabularFormat) -> Self {
        Self {
            bytes,
            format,
            options: ReaderOptions::default(),
        }
    }

    /// Resolves the format from the file name and the payload's magic number.
    pub fn from_named_bytes(name: &Path, bytes: Vec<u8>, options: ReaderOptions) -> Self {
        let format = TabularFormat::detect(Some(name), &bytes);
        Self {
            bytes,
            format,
            options,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }
}

/// Canonical header mapping plus the records it produced.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub raw_headers: Vec<String>,
    pub mapping: HeaderMapping,
    pub records: Vec<EmployeeRecord>,
}

pub fn import_table(table: RawTable) -> ImportOutcome {
    let (raw_headers, rows) = table.split();
    let mapping = canonicalize_headers(&raw_headers);
    debug!("Header mapping {:?} -> {:?}", raw_headers, mapping);
    let records = map_rows(&mapping, &rows);
    ImportOutcome {
        raw_headers,
        mapping,
        records,
    }
}

pub fn import_detailed(payload: &ImportPayload) -> Result<ImportOutcome, DecodeError> {
    let table = read_table(&payload.bytes, payload.format, &payload.options)?;
    let outcome = import_table(table);
    info!(
        "Imported {} record(s) across {} column(s) from {} payload ({} byte(s))",
        outcome.records.len(),
        outcome.raw_headers.len(),
        payload.format,
        payload.bytes.len()
    );
    Ok(outcome)
}

pub fn import_payload(payload: &ImportPayload) -> Result<Vec<EmployeeRecord>, DecodeError> {
    import_detailed(payload).map(|outcome| outcome.records)
}

/// Handle to an import running on a worker thread.
///
/// [`ImportHandle::join`] consumes the handle, so the outcome is observed
/// exactly once.
#[derive(Debug)]
pub struct ImportHandle {
    worker: JoinHandle<Result<Vec<EmployeeRecord>, DecodeError>>,
}

impl ImportHandle {
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    pub fn join(self) -> Result<Vec<EmployeeRecord>, DecodeError> {
        self.worker
            .join()
            .unwrap_or(Err(DecodeError::WorkerPanicked))
    }
}

pub fn spawn_import(payload: ImportPayload) -> ImportHandle {
    ImportHandle {
        worker: thread::spawn(move || import_payload(&payload)),
    }
}
