//! Report command for per-operator hours and per-day record counts.
//!
//! This module implements `pt report` with human-readable and JSON output.

use std::io::Write;

use anyhow::Result;
use pt_core::{DailyCount, PairingConfig, PersonTotal, daily_counts, pair_events, person_totals};
use serde::Serialize;

use crate::commands::util::{Dataset, format_hours, section_header};

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub record_count: usize,
    pub skipped_rows: usize,
    pub totals: Vec<PersonTotal>,
    pub daily_counts: Vec<DailyCount>,
}

/// Builds the report from a filtered dataset.
pub fn generate_report_data(dataset: &Dataset, config: &PairingConfig) -> ReportData {
    let outcomes = pair_events(&dataset.events, config);
    ReportData {
        record_count: dataset.records.len(),
        skipped_rows: dataset.skipped_rows,
        totals: person_totals(&outcomes),
        daily_counts: daily_counts(&dataset.records),
    }
}

/// Writes the human-readable report.
pub fn write_report<W: Write>(writer: &mut W, data: &ReportData) -> Result<()> {
    writeln!(writer, "{}", section_header("REPORT"))?;
    writeln!(
        writer,
        "Records: {} ({} skipped)",
        data.record_count, data.skipped_rows
    )?;

    if data.record_count == 0 {
        writeln!(writer)?;
        writeln!(writer, "No records in the selection.")?;
        return Ok(());
    }

    // HOURS section
    writeln!(writer)?;
    writeln!(writer, "{}", section_header("HOURS"))?;
    if data.totals.is_empty() {
        writeln!(writer, "(no clock events)")?;
    } else {
        let width = data
            .totals
            .iter()
            .map(|t| t.person.chars().count())
            .chain(std::iter::once("Operator".len()))
            .max()
            .unwrap_or_default();

        writeln!(
            writer,
            "{:<width$}  {:>6}  {:>8}  {:>8}",
            "Operator", "Shifts", "Total", "Average"
        )?;
        for total in &data.totals {
            let flag = if total.dangling { "  *" } else { "" };
            writeln!(
                writer,
                "{:<width$}  {:>6}  {:>8}  {:>8}{flag}",
                total.person,
                total.shift_count,
                format_hours(total.total_hours),
                format_hours(total.average_hours)
            )?;
        }
        if data.totals.iter().any(|t| t.dangling) {
            writeln!(writer, "* entry still open at end of data")?;
        }
    }

    // DAILY RECORDS section
    writeln!(writer)?;
    writeln!(writer, "{}", section_header("DAILY RECORDS"))?;
    let width = data
        .daily_counts
        .iter()
        .map(|c| c.person.chars().count())
        .max()
        .unwrap_or_default();
    for count in &data.daily_counts {
        writeln!(
            writer,
            "{}  {:<width$}  {:>4}",
            count.date.format("%Y-%m-%d"),
            count.person,
            count.count
        )?;
    }

    Ok(())
}

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    dataset: &Dataset,
    config: &PairingConfig,
    json: bool,
) -> Result<()> {
    let data = generate_report_data(dataset, config);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&data)?)?;
    } else {
        write_report(writer, &data)?;
    }

    Ok(())
}
