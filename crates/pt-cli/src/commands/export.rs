//! Implementation of the `pt export` command.
//!
//! Writes the flat `{person, metric, value}` table built from the
//! per-operator totals as CSV, JSON or XLSX.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pt_core::{MetricRow, PairingConfig, metric_rows, pair_events, person_totals};
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, XlsxError};
use thiserror::Error;

use crate::ExportFormat;
use crate::commands::util::Dataset;

const HEADERS: [&str; 3] = ["person", "metric", "value"];

/// Errors raised by the export writers.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes rows as CSV with a header line.
pub fn write_csv(path: &Path, rows: &[MetricRow]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(HEADERS)?;
    for row in rows {
        let value = row.value.to_string();
        wtr.write_record([row.person.as_str(), row.metric, value.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes rows as a pretty-printed JSON array.
pub fn write_json(path: &Path, rows: &[MetricRow]) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

/// Writes rows to a single-sheet workbook with a styled, frozen header.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn write_xlsx(path: &Path, rows: &[MetricRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x00FF_FFFF))
        .set_background_color(Color::RGB(0x002F_75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new().set_border(FormatBorder::Thin);

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut person_width = HEADERS[0].len();
    for (index, row) in rows.iter().enumerate() {
        let line = (index + 1) as u32;
        worksheet.write_with_format(line, 0, row.person.as_str(), &cell_format)?;
        worksheet.write_with_format(line, 1, row.metric, &cell_format)?;
        worksheet.write_with_format(line, 2, row.value, &cell_format)?;
        person_width = person_width.max(row.person.chars().count());
    }

    worksheet.set_column_width(0, person_width as f64 + 2.0)?;
    worksheet.set_column_width(1, 16)?;
    worksheet.set_column_width(2, 10)?;

    workbook.save(path)?;
    Ok(())
}

/// Runs the export command.
pub fn run(
    dataset: &Dataset,
    config: &PairingConfig,
    format: ExportFormat,
    output: &Path,
) -> Result<()> {
    let outcomes = pair_events(&dataset.events, config);
    let rows = metric_rows(&person_totals(&outcomes));

    match format {
        ExportFormat::Csv => write_csv(output, &rows),
        ExportFormat::Json => write_json(output, &rows),
        ExportFormat::Xlsx => write_xlsx(output, &rows),
    }
    .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        format = format.as_str(),
        rows = rows.len(),
        path = %output.display(),
        "export completed"
    );
    Ok(())
}
