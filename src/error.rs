use thiserror::Error;

use crate::reader::TabularFormat;

/// Failure to turn a payload into a [`RawTable`](crate::reader::RawTable).
///
/// Fatal to the import attempt that produced it; callers keep their previous
/// collection untouched.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),
    #[error("Failed to decode text with encoding {encoding}")]
    Encoding { encoding: &'static str },
    #[error("Malformed CSV near row {row}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Unreadable {format} workbook")]
    Workbook {
        format: TabularFormat,
        #[source]
        source: calamine::Error,
    },
    #[error("Import worker stopped before delivering a result")]
    WorkerPanicked,
}
