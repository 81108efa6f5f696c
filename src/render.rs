//! Text, JSON and CSV renderings of records for the command-line front end.

use std::{borrow::Cow, fmt::Write as _, io};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::{
    query::{QueryState, SortDirection},
    record::{CanonicalField, EmployeeRecord},
    status::status_label,
};

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Column-aligned grid of already formatted cells.
#[derive(Debug, Clone, Default)]
pub struct TextGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextGrid {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut widths = self
            .headers
            .iter()
            .map(|header| visible_width(header))
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(visible_width(cell));
            }
        }

        let rule = widths
            .iter()
            .map(|width| "-".repeat((*width).max(3)))
            .collect::<Vec<_>>();
        let rule_widths = widths.iter().map(|width| (*width).max(3)).collect::<Vec<_>>();

        let mut output = String::new();
        let _ = writeln!(output, "{}", pad_line(&self.headers, &widths));
        let _ = writeln!(output, "{}", pad_line(&rule, &rule_widths));
        for row in &self.rows {
            let _ = writeln!(output, "{}", pad_line(row, &widths));
        }
        output
    }
}

/// Grid of records with a status label column and optional selection marks.
///
/// The sorted column's caption carries `^` (ascending) or `v` (descending).
pub fn record_grid<'a, I>(records: I, state: Option<&QueryState>) -> TextGrid
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let sort = state.and_then(|state| state.sort);
    let mut headers = Vec::with_capacity(CanonicalField::ALL.len() + 1);
    if state.is_some() {
        headers.push("Sel".to_string());
    }
    for field in CanonicalField::ALL {
        let caption = match sort {
            Some(key) if key.field == field => match key.direction {
                SortDirection::Asc => format!("{} ^", field.title()),
                SortDirection::Desc => format!("{} v", field.title()),
            },
            _ => field.title().to_string(),
        };
        headers.push(caption);
    }

    let mut grid = TextGrid::new(headers);
    for record in records {
        let mut row = Vec::with_capacity(grid.headers.len());
        if let Some(state) = state {
            let mark = if state.is_selected(&record.id) { "[x]" } else { "[ ]" };
            row.push(mark.to_string());
        }
        row.extend([
            record.id.clone(),
            record.profile.clone(),
            record.email.clone(),
            record.role.clone(),
            status_label(&record.status),
        ]);
        grid.push(row);
    }
    grid
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Serializing JSON output")?;
    println!("{text}");
    Ok(())
}

pub fn write_csv<'a, I>(records: I, sink: impl io::Write) -> Result<()>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut writer = csv::Writer::from_writer(sink);
    let mut wrote_any = false;
    for record in records {
        writer.serialize(record).context("Writing CSV record")?;
        wrote_any = true;
    }
    if !wrote_any {
        writer
            .write_record(CanonicalField::ALL.map(|field| field.as_str()))
            .context("Writing CSV header")?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

fn pad_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let clean = flatten_whitespace(cell);
            let padding = width.saturating_sub(visible_width(&clean));
            format!("{clean}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

/// Character count, skipping ANSI colour sequences.
fn visible_width(value: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for ch in value.chars() {
        match (in_escape, ch) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

fn flatten_whitespace(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
