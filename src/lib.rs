//! Employee roster import.
//!
//! Turns a CSV or Excel file with arbitrary, human-written column titles into a
//! fixed collection of [`EmployeeRecord`](record::EmployeeRecord)s, then answers
//! search, filter, sort, selection and status-count queries over it.
//!
//! ```text
//! bytes -> reader -> headers -> mapper -> store / status
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod headers;
pub mod import;
pub mod mapper;
pub mod query;
pub mod reader;
pub mod record;
pub mod render;
pub mod status;
pub mod store;
pub mod upload;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    error::DecodeError,
    import::{ImportPayload, import_payload, spawn_import},
    query::QueryState,
    reader::{RawTable, ReaderOptions, TabularFormat},
    record::{CanonicalField, EmployeeRecord},
    status::{StatusCounts, aggregate_status},
    store::RecordStore,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("roster_import", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => commands::handle_import(&args),
        Commands::Headers(args) => commands::handle_headers(&args),
        Commands::Query(args) => commands::handle_query(&args),
        Commands::Summary(args) => commands::handle_summary(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
