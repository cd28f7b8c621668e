//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use pt_core::{ClockEvent, RecordFilter};

use crate::ingest::{self, ActionLabels, LoadedData, RawRecord};
use crate::{Config, InputArgs};

/// Filtered input ready for the commands.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Every kept record that passed the filter, whatever its label.
    pub records: Vec<RawRecord>,
    /// The clock-in/clock-out subset of `records`.
    pub events: Vec<ClockEvent>,
    /// Rows dropped while reading the file.
    pub skipped_rows: usize,
}

impl Dataset {
    /// Applies `filter` to loaded data and extracts clock events.
    pub fn from_loaded(data: LoadedData, filter: &RecordFilter, labels: &ActionLabels) -> Self {
        let records = filter.apply(&data.records);
        let events = ingest::clock_events(&records, labels);
        Self {
            records,
            events,
            skipped_rows: data.skipped_rows,
        }
    }
}

/// Reads the input file and applies the command-line filters.
pub fn load_dataset(input: &InputArgs, config: &Config) -> Result<Dataset> {
    let filter = RecordFilter::new(input.persons.iter().cloned(), input.from, input.to)
        .context("invalid record filter")?;

    let data = ingest::load_file(&input.file, config)
        .with_context(|| format!("failed to load {}", input.file.display()))?;

    if data.skipped_rows > 0 {
        tracing::warn!(
            skipped = data.skipped_rows,
            "some rows were dropped while loading"
        );
    }

    let dataset = Dataset::from_loaded(data, &filter, &ActionLabels::from_config(config));
    tracing::debug!(
        records = dataset.records.len(),
        events = dataset.events.len(),
        "dataset ready"
    );
    Ok(dataset)
}

/// Formats an hour count with two decimals, e.g. `8.50h`.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}h")
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Underlines a section title with box-drawing characters.
pub fn section_header(title: &str) -> String {
    format!("{title}\n{}", "─".repeat(title.chars().count()))
}
