//! Tabular Reader: payload bytes to a grid of cell strings.
//!
//! Three container formats are understood:
//!
//! - **CSV**: decoded with `encoding_rs` (UTF-8 by default, BOM aware) and
//!   parsed with flexible framing so ragged rows survive intact.
//! - **XLS / XLSX**: opened from memory with `calamine`; only the first sheet
//!   is read.
//!
//! The reader never interprets the header row. Row 0 of a [`RawTable`] is
//! whatever the file's first row held, and cell values are stringified before
//! leaving this module.

use std::{fmt, io::Cursor, path::Path};

use calamine::{Data, Reader, Xls, Xlsx};
use chrono::Timelike;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};

use crate::error::DecodeError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xls,
    Xlsx,
}

impl TabularFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(TabularFormat::Csv),
            "xls" => Some(TabularFormat::Xls),
            "xlsx" => Some(TabularFormat::Xlsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Recognises workbook containers by their magic number.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            Some(TabularFormat::Xlsx)
        } else if bytes.starts_with(OLE_MAGIC) {
            Some(TabularFormat::Xls)
        } else {
            None
        }
    }

    /// Content sniffing wins over the declared name; CSV is the fallback.
    pub fn detect(name: Option<&Path>, bytes: &[u8]) -> Self {
        let sniffed = Self::sniff(bytes);
        let declared = name.and_then(Self::from_path);
        if let (Some(found), Some(claimed)) = (sniffed, declared)
            && found != claimed
        {
            debug!("Payload declared as {claimed} but looks like {found}");
        }
        sniffed.or(declared).unwrap_or(TabularFormat::Csv)
    }
}

impl fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TabularFormat::Csv => "CSV",
            TabularFormat::Xls => "XLS",
            TabularFormat::Xlsx => "XLSX",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

impl ReaderOptions {
    /// Builds options from command-line overrides; absent values keep the defaults.
    pub fn from_flags(
        delimiter: Option<u8>,
        encoding_label: Option<&str>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            delimiter: delimiter.unwrap_or(DEFAULT_CSV_DELIMITER),
            encoding: resolve_encoding(encoding_label)?,
        })
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, DecodeError> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| DecodeError::UnknownEncoding(value.to_string())),
        None => Ok(UTF_8),
    }
}

/// Untyped rows straight out of the file; row 0 holds the raw headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header row and data rows. A table without rows has no headers.
    pub fn split(self) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rows = self.rows.into_iter();
        let headers = rows.next().unwrap_or_default();
        (headers, rows.collect())
    }
}

pub fn read_table(
    bytes: &[u8],
    format: TabularFormat,
    options: &ReaderOptions,
) -> Result<RawTable, DecodeError> {
    if bytes.is_empty() {
        return Ok(RawTable::default());
    }
    let table = match format {
        TabularFormat::Csv => read_csv(bytes, options)?,
        TabularFormat::Xls => read_first_sheet::<Xls<Cursor<&[u8]>>>(bytes, format)?,
        TabularFormat::Xlsx => read_first_sheet::<Xlsx<Cursor<&[u8]>>>(bytes, format)?,
    };
    debug!("Decoded {format} payload into {} row(s)", table.len());
    Ok(table)
}

fn read_csv(bytes: &[u8], options: &ReaderOptions) -> Result<RawTable, DecodeError> {
    let text = decode_text(bytes, options.encoding)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DecodeError::Csv {
            row: idx + 1,
            source,
        })?;
        // The csv parser drops empty lines; interior ones still count as rows.
        if idx > 0
            && let Some(offset) = record
                .position()
                .and_then(|position| usize::try_from(position.byte()).ok())
        {
            let skipped = blank_lines_before(text.as_bytes(), offset);
            rows.extend(std::iter::repeat_with(Vec::new).take(skipped));
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(rows))
}

/// Counts the empty lines between the end of the previous record and the
/// record whose parse started at `offset`.
///
/// A record position points just past the bytes the parser consumed for the
/// previous record. With a `\r\n` terminator that may be the `\r` alone, so a
/// dangling `\n` right after it belongs to the previous record.
fn blank_lines_before(input: &[u8], offset: usize) -> usize {
    let Some(tail) = input.get(offset..) else {
        return 0;
    };
    let mut run = &tail[..tail
        .iter()
        .take_while(|&&byte| matches!(byte, b'\r' | b'\n'))
        .count()];
    if offset > 0 && input[offset - 1] == b'\r' && run.first() == Some(&b'\n') {
        run = &run[1..];
    }

    let mut lines = 0;
    let mut idx = 0;
    while idx < run.len() {
        idx += if run[idx] == b'\r' && run.get(idx + 1) == Some(&b'\n') {
            2
        } else {
            1
        };
        lines += 1;
    }
    lines
}

/// Decodes with BOM sniffing; any malformed sequence rejects the payload.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        warn!(
            "Byte-order mark overrides {}; decoding as {}",
            encoding.name(),
            used.name()
        );
    }
    if had_errors {
        return Err(DecodeError::Encoding {
            encoding: used.name(),
        });
    }
    Ok(text.into_owned())
}

fn read_first_sheet<'a, R>(bytes: &'a [u8], format: TabularFormat) -> Result<RawTable, DecodeError>
where
    R: Reader<Cursor<&'a [u8]>>,
    calamine::Error: From<R::Error>,
{
    let wrap = |err: R::Error| DecodeError::Workbook {
        format,
        source: calamine::Error::from(err),
    };
    let mut workbook = R::new(Cursor::new(bytes)).map_err(wrap)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(RawTable::default());
    };
    let range = range.map_err(wrap)?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(RawTable::new(rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_number(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => match value.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_number(value.as_f64()),
        },
        Data::Error(err) => err.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also catches -0.0
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    fn csv(text: &str) -> RawTable {
        read_table(text.as_bytes(), TabularFormat::Csv, &ReaderOptions::default())
            .expect("decode csv")
    }

    #[test]
    fn keeps_ragged_rows_as_is() {
        let table = csv("a,b,c\n1\n1,2,3,4\n");
        let widths = table.rows().iter().map(Vec::len).collect::<Vec<_>>();
        assert_eq!(widths, vec![3, 1, 4]);
    }

    #[test]
    fn empty_payload_yields_empty_table() {
        for format in [TabularFormat::Csv, TabularFormat::Xls, TabularFormat::Xlsx] {
            let table = read_table(&[], format, &ReaderOptions::default()).expect("empty payload");
            assert!(table.is_empty(), "{format} should decode to zero rows");
        }
    }

    #[test]
    fn split_separates_header_row() {
        let (headers, rows) = csv("ID,Name\nE1,Ann\nE2,Bo\n").split();
        assert_eq!(headers, vec!["ID", "Name"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["E2", "Bo"]);

        let (headers, rows) = RawTable::default().split();
        assert!(headers.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let (headers, _) = csv("\u{feff}Employee ID,Status\nE1,Active\n").split();
        assert_eq!(headers[0], "Employee ID");
    }

    #[test]
    fn honours_custom_delimiter() {
        let options = ReaderOptions {
            delimiter: b';',
            ..ReaderOptions::default()
        };
        let table = read_table(b"id;role\n7;Chef\n", TabularFormat::Csv, &options)
            .expect("decode semicolon csv");
        assert_eq!(table.rows()[1], vec!["7", "Chef"]);
    }

    #[test]
    fn decodes_legacy_single_byte_encoding() {
        let (bytes, _, _) = WINDOWS_1252.encode("name\nJosé\n");
        let options = ReaderOptions {
            encoding: WINDOWS_1252,
            ..ReaderOptions::default()
        };
        let table = read_table(&bytes, TabularFormat::Csv, &options).expect("decode cp1252");
        assert_eq!(table.rows()[1][0], "José");
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = read_table(b"name\n\xff\xfe\xfd\n", TabularFormat::Csv, &ReaderOptions::default())
            .expect_err("invalid utf-8");
        assert!(matches!(err, DecodeError::Encoding { .. }));
    }

    #[test]
    fn corrupt_workbooks_fail_to_decode() {
        let garbage = b"definitely not a spreadsheet";
        for format in [TabularFormat::Xls, TabularFormat::Xlsx] {
            let err = read_table(garbage, format, &ReaderOptions::default())
                .expect_err("garbage workbook");
            assert!(matches!(err, DecodeError::Workbook { .. }), "{format}: {err}");
        }
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        let err = resolve_encoding(Some("klingon-8")).expect_err("unknown label");
        assert_eq!(err.to_string(), "Unknown encoding 'klingon-8'");
        assert_eq!(resolve_encoding(Some(" latin1 ")).expect("latin1"), WINDOWS_1252);
    }

    #[test]
    fn detect_prefers_magic_numbers_over_names() {
        let zip = b"PK\x03\x04rest";
        assert_eq!(
            TabularFormat::detect(Some(Path::new("staff.csv")), zip),
            TabularFormat::Xlsx
        );
        assert_eq!(
            TabularFormat::detect(Some(Path::new("staff.XLS")), b"id,name"),
            TabularFormat::Xls
        );
        assert_eq!(TabularFormat::detect(None, b"id,name"), TabularFormat::Csv);
    }

    #[test]
    fn flags_override_reader_defaults() {
        let options = ReaderOptions::from_flags(None, None).expect("defaults");
        assert_eq!(options.delimiter, b',');
        assert_eq!(options.encoding, UTF_8);

        let options = ReaderOptions::from_flags(Some(b'|'), Some("cp1252")).expect("overrides");
        assert_eq!(options.delimiter, b'|');
        assert_eq!(options.encoding, WINDOWS_1252);
    }

    #[test]
    fn only_roster_extensions_declare_a_format() {
        assert_eq!(TabularFormat::from_extension(".CSV"), Some(TabularFormat::Csv));
        assert_eq!(TabularFormat::from_extension("xls"), Some(TabularFormat::Xls));
        assert_eq!(TabularFormat::from_extension("Xlsx"), Some(TabularFormat::Xlsx));
        for other in ["tsv", "txt", "xlsm", "ods", ""] {
            assert_eq!(TabularFormat::from_extension(other), None, "{other}");
        }
    }

    #[test]
    fn interior_blank_lines_become_empty_rows() {
        let table = csv("ID,Status\nE1,Active\n\nE2,Active\n");
        assert_eq!(
            table.rows(),
            &[
                vec!["ID".to_string(), "Status".to_string()],
                vec!["E1".to_string(), "Active".to_string()],
                Vec::new(),
                vec!["E2".to_string(), "Active".to_string()],
            ]
        );
    }

    #[test]
    fn blank_line_counting_handles_every_terminator() {
        let widths = |text: &str| {
            csv(text)
                .rows()
                .iter()
                .map(Vec::len)
                .collect::<Vec<_>>()
        };
        assert_eq!(widths("a,b\r\n1,2\r\n\r\n\r\n3,4\r\n"), vec![2, 2, 0, 0, 2]);
        assert_eq!(widths("a\r1\r\r2\r"), vec![1, 1, 0, 1]);
        assert_eq!(widths("a\n\"x\n\ny\"\n\n2\n"), vec![1, 1, 0, 1]);
    }

    #[test]
    fn leading_and_trailing_blank_lines_are_not_rows() {
        let table = csv("\n\nID,Status\nE1,Active\n\n\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], "ID");
    }

    #[test]
    fn numeric_cells_render_without_trailing_zeroes() {
        assert_eq!(cell_text(&Data::Float(42.0)), "42");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Float(-0.0)), "0");
        assert_eq!(cell_text(&Data::Float(-7.0)), "-7");
        assert_eq!(cell_text(&Data::Int(-3)), "-3");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }
}
