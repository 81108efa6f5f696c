use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;

use crate::{
    query::{ALL_ROLE, ALL_STATUS},
    record::CanonicalField,
    render::OutputFormat,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Import employee rosters from CSV or Excel files and explore them",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a roster file and print every normalized record
    Import(ImportArgs),
    /// Show how each column header was recognized
    Headers(HeadersArgs),
    /// Search, filter, sort and select records from a roster file
    Query(QueryArgs),
    /// Count records by employment status and list filter values
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Roster file to import (.csv, .xls or .xlsx)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column separator for CSV rosters: one character, or comma, semicolon, tab or pipe
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output rendering
    #[arg(long = "output-format", value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct HeadersArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output rendering (csv is treated as table)
    #[arg(long = "output-format", value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Case-insensitive text matched against every field
    #[arg(long, default_value = "")]
    pub search: String,
    /// Keep only records with this status (case-insensitive)
    #[arg(long, default_value = ALL_STATUS)]
    pub status: String,
    /// Keep only records with this role (case-insensitive)
    #[arg(long, default_value = ALL_ROLE)]
    pub role: String,
    /// Click a column header; repeat to cycle ascending, descending, unsorted
    #[arg(long = "sort", action = clap::ArgAction::Append)]
    pub sort: Vec<CanonicalField>,
    /// Select every record left visible by the filters and search
    #[arg(long = "select-all")]
    pub select_all: bool,
    /// Select a record by id
    #[arg(long = "select", action = clap::ArgAction::Append)]
    pub select: Vec<String>,
    /// Deselect a record by id (applied after selections)
    #[arg(long = "deselect", action = clap::ArgAction::Append)]
    pub deselect: Vec<String>,
    /// Output rendering
    #[arg(long = "output-format", value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output rendering (csv is treated as table)
    #[arg(long = "output-format", value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

/// Names accepted by `--delimiter` in place of the literal character.
pub const NAMED_DELIMITERS: &[(&str, u8)] = &[
    ("comma", b','),
    ("semicolon", b';'),
    ("tab", b'\t'),
    ("pipe", b'|'),
];

/// Parses `--delimiter`: a name from [`NAMED_DELIMITERS`] or a single ASCII
/// character. Quotes and line breaks are refused since the roster reader
/// relies on them for framing.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    if let Some((_, byte)) = NAMED_DELIMITERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
    {
        return Ok(*byte);
    }
    let byte = match value.as_bytes() {
        [] => return Err("Delimiter cannot be empty".to_string()),
        [byte] if byte.is_ascii() => *byte,
        _ => {
            return Err(format!(
                "Delimiter '{value}' must be one ASCII character or one of: {}",
                NAMED_DELIMITERS.iter().map(|(name, _)| name).join(", ")
            ));
        }
    };
    match byte {
        b'"' => Err("The quote character cannot separate roster columns".to_string()),
        b'\r' | b'\n' => Err("Line breaks cannot separate roster columns".to_string()),
        _ => Ok(byte),
    }
}
