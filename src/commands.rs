//! Subcommand handlers. Each one gates the input file, imports it and
//! renders the result to stdout.

use std::{fs, io};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::{
    cli::{HeadersArgs, ImportArgs, InputArgs, QueryArgs, SummaryArgs},
    headers::HeaderSlot,
    import::{self, ImportOutcome, ImportPayload},
    printable_delimiter,
    query::{ALL_ROLE, ALL_STATUS},
    reader::ReaderOptions,
    render::{self, OutputFormat, TextGrid},
    status::{StatusCounts, status_label},
    store::{FilterOptions, RecordStore},
    upload,
};

fn load_payload(source: &InputArgs) -> Result<ImportPayload> {
    let metadata = fs::metadata(&source.input)
        .with_context(|| format!("Reading metadata for {:?}", source.input))?;
    upload::check_upload(&source.input, metadata.len())
        .with_context(|| format!("Rejecting {:?}", source.input))?;
    let bytes =
        fs::read(&source.input).with_context(|| format!("Opening input file {:?}", source.input))?;
    let options =
        ReaderOptions::from_flags(source.delimiter, source.input_encoding.as_deref())?;
    let payload = ImportPayload::from_named_bytes(&source.input, bytes, options);
    info!(
        "Importing '{}' as {} (delimiter '{}', encoding {})",
        source.input.display(),
        payload.format,
        printable_delimiter(options.delimiter),
        options.encoding.name()
    );
    Ok(payload)
}

/// Decodes off the calling thread and swaps the result into a fresh store.
fn load_store(source: &InputArgs) -> Result<RecordStore> {
    let payload = load_payload(source)?;
    let records = import::spawn_import(payload)
        .join()
        .with_context(|| format!("Importing {:?}", source.input))?;
    let mut store = RecordStore::default();
    store.replace(records);
    Ok(store)
}

pub fn handle_import(args: &ImportArgs) -> Result<()> {
    let store = load_store(&args.source)?;
    match args.output_format {
        OutputFormat::Table => print!("{}", render::record_grid(store.records(), None).render()),
        OutputFormat::Json => render::print_json(store.records())?,
        OutputFormat::Csv => render::write_csv(store.records(), io::stdout().lock())?,
    }
    info!("Displayed {} record(s)", store.len());
    Ok(())
}

#[derive(Debug, Serialize)]
struct HeaderReport<'a> {
    position: usize,
    raw: &'a str,
    mapped: &'a HeaderSlot,
}

pub fn handle_headers(args: &HeadersArgs) -> Result<()> {
    let payload = load_payload(&args.source)?;
    let ImportOutcome {
        raw_headers,
        mapping,
        records,
    } = import::import_detailed(&payload)
        .with_context(|| format!("Importing {:?}", args.source.input))?;

    let report = raw_headers
        .iter()
        .zip(&mapping)
        .enumerate()
        .map(|(idx, (raw, mapped))| HeaderReport {
            position: idx + 1,
            raw,
            mapped,
        })
        .collect::<Vec<_>>();

    if args.output_format == OutputFormat::Json {
        return render::print_json(&report);
    }
    let mut grid = TextGrid::new(vec![
        "#".to_string(),
        "header".to_string(),
        "field".to_string(),
    ]);
    for entry in &report {
        grid.push(vec![
            entry.position.to_string(),
            entry.raw.to_string(),
            entry.mapped.to_string(),
        ]);
    }
    print!("{}", grid.render());
    info!(
        "Mapped {} header(s) over {} data row(s)",
        report.len(),
        records.len()
    );
    Ok(())
}

pub fn handle_query(args: &QueryArgs) -> Result<()> {
    let mut store = load_store(&args.source)?;
    for field in &args.sort {
        store.sort(*field);
    }
    store.filter(&args.status, &args.role);
    store.search(&args.search);
    if args.select_all {
        store.select_all(true);
    }
    for id in &args.select {
        store.select_row(id, true);
    }
    for id in &args.deselect {
        store.select_row(id, false);
    }
    debug!("Query state: {:?}", store.state());

    let snapshot = store.snapshot();
    match args.output_format {
        OutputFormat::Json => render::print_json(&snapshot)?,
        OutputFormat::Csv => render::write_csv(
            snapshot.rows.iter().map(|row| &row.record),
            io::stdout().lock(),
        )?,
        OutputFormat::Table => {
            let visible = store.visible();
            print!(
                "{}",
                render::record_grid(visible.iter().copied(), Some(store.state())).render()
            );
            println!(
                "Showing {} of {} record(s); {} selected ({} visible)",
                snapshot.rows.len(),
                snapshot.total,
                snapshot.selected.len(),
                snapshot.visible_selected
            );
        }
    }
    info!(
        "Query matched {} of {} record(s)",
        snapshot.rows.len(),
        snapshot.total
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct Summary {
    counts: StatusCounts,
    filters: FilterOptions,
}

pub fn handle_summary(args: &SummaryArgs) -> Result<()> {
    let store = load_store(&args.source)?;
    let summary = Summary {
        counts: store.status_counts(),
        filters: store.filter_options(),
    };
    if args.output_format == OutputFormat::Json {
        return render::print_json(&summary);
    }

    let counts = summary.counts;
    let mut grid = TextGrid::new(vec!["status".to_string(), "count".to_string()]);
    for (label, count) in [
        ("Active", counts.active),
        ("On Leave", counts.leave),
        ("Terminated", counts.terminated),
        ("Other", counts.unclassified()),
        ("Total", counts.total),
    ] {
        grid.push(vec![label.to_string(), count.to_string()]);
    }
    print!("{}", grid.render());

    let statuses = std::iter::once(ALL_STATUS.to_string())
        .chain(summary.filters.statuses.iter().map(|status| status_label(status)))
        .collect::<Vec<_>>();
    let roles = std::iter::once(ALL_ROLE.to_string())
        .chain(summary.filters.roles.iter().cloned())
        .collect::<Vec<_>>();
    println!("Status filter: {}", statuses.join(", "));
    println!("Role filter: {}", roles.join(", "));
    Ok(())
}
