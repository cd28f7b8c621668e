//! Loading time-clock exports.
//!
//! Reads a delimited file or a spreadsheet workbook with a header row. Rows
//! with an empty operator or a timestamp matching none of the configured
//! formats are dropped with a warning; so are CSV rows that are not valid
//! UTF-8. Everything else becomes a [`RawRecord`]. Only rows whose action
//! label is one of the two clock labels turn into [`ClockEvent`]s, but every
//! kept row counts as a record for the per-day counts.

use std::io;
use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::{Duration, DurationRound, NaiveDate, NaiveDateTime};
use pt_core::{ClockAction, ClockEvent, PersonRecord};
use thiserror::Error;

use crate::Config;

/// File extensions read as workbooks rather than CSV.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Errors raised while reading an export.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The workbook could not be opened or its first sheet read.
    #[error("failed to read workbook {}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook {} has no worksheet", path.display())]
    NoWorksheet { path: PathBuf },
    /// A required column is absent from the header row.
    #[error("missing column '{column}' in header")]
    MissingColumn { column: String },
    /// The configured delimiter is not a single-byte character.
    #[error("delimiter must be an ASCII character, got '{0}'")]
    InvalidDelimiter(char),
    /// Malformed CSV content.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// One kept row of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub person: String,
    pub timestamp: NaiveDateTime,
    /// The action label as written in the file.
    pub label: String,
}

impl PersonRecord for RawRecord {
    fn person(&self) -> &str {
        &self.person
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Maps spreadsheet action labels to clock actions.
#[derive(Debug, Clone)]
pub struct ActionLabels {
    clock_in: String,
    clock_out: String,
}

impl ActionLabels {
    pub fn new(clock_in: &str, clock_out: &str) -> Self {
        Self {
            clock_in: clock_in.trim().to_lowercase(),
            clock_out: clock_out.trim().to_lowercase(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.clock_in_label, &config.clock_out_label)
    }

    /// Case-insensitive match after trimming.
    pub fn action_for(&self, label: &str) -> Option<ClockAction> {
        let label = label.trim().to_lowercase();
        if label == self.clock_in {
            Some(ClockAction::ClockIn)
        } else if label == self.clock_out {
            Some(ClockAction::ClockOut)
        } else {
            None
        }
    }
}

/// Result of reading an export.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub records: Vec<RawRecord>,
    /// Rows dropped for an empty operator, an unreadable timestamp or bad
    /// encoding.
    pub skipped_rows: usize,
}

impl LoadedData {
    /// The records carrying a clock label, as clock events.
    pub fn clock_events(&self, labels: &ActionLabels) -> Vec<ClockEvent> {
        clock_events(&self.records, labels)
    }

    fn skip(&mut self) {
        self.skipped_rows += 1;
    }

    /// Keeps one data row, or skips it with a warning.
    ///
    /// `timestamp` is the already-parsed cell; `raw_timestamp` is only used
    /// in the warning.
    fn push_row(
        &mut self,
        line: usize,
        person: &str,
        timestamp: Option<NaiveDateTime>,
        raw_timestamp: &str,
        label: &str,
    ) {
        let person = person.trim();
        if person.is_empty() {
            tracing::warn!(line, "skipping row without operator");
            self.skip();
            return;
        }

        let Some(timestamp) = timestamp else {
            tracing::warn!(line, value = raw_timestamp, "skipping row with unreadable date");
            self.skip();
            return;
        };

        self.records.push(RawRecord {
            person: person.to_string(),
            timestamp,
            label: label.trim().to_string(),
        });
    }
}

/// Converts the records carrying a clock label into clock events.
pub fn clock_events(records: &[RawRecord], labels: &ActionLabels) -> Vec<ClockEvent> {
    records
        .iter()
        .filter_map(|r| {
            labels
                .action_for(&r.label)
                .map(|action| ClockEvent::new(r.person.clone(), r.timestamp, action))
        })
        .collect()
}

/// Parses a timestamp using the first matching format.
///
/// Date-only formats yield midnight.
pub fn parse_timestamp(
    raw: &str,
    datetime_formats: &[String],
    date_formats: &[String],
) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

/// Whether `path` is read as a workbook rather than CSV.
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Reads an export from disk, choosing the reader from the file extension.
pub fn load_file(path: &Path, config: &Config) -> Result<LoadedData, IngestError> {
    if is_workbook(path) {
        load_workbook(path, config)
    } else {
        load_csv(path, config)
    }
}

/// Reads a CSV export from disk.
pub fn load_csv(path: &Path, config: &Config) -> Result<LoadedData, IngestError> {
    let delimiter = delimiter_byte(config.delimiter)?;
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    read_records(reader, config)
}

/// Reads a CSV export from any reader.
pub fn load_reader<R: io::Read>(input: R, config: &Config) -> Result<LoadedData, IngestError> {
    let delimiter = delimiter_byte(config.delimiter)?;
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    read_records(reader, config)
}

/// Reads the first worksheet of a workbook.
///
/// Date cells are taken as-is; text cells go through the configured formats.
pub fn load_workbook(path: &Path, config: &Config) -> Result<LoadedData, IngestError> {
    let workbook_error = |source: calamine::Error| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_error)?;

    // Sheet row of the header, 0-based
    let header_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let columns = Columns::locate(&headers, config)?;

    let mut data = LoadedData::default();
    for (index, row) in rows.enumerate() {
        let line = header_row + index + 2;
        let cell_text = |idx: usize| row.get(idx).map(ToString::to_string).unwrap_or_default();

        let timestamp = match row.get(columns.timestamp) {
            Some(Data::String(text)) => {
                parse_timestamp(text, &config.datetime_formats, &config.date_formats)
            }
            // Serial dates carry float noise
            Some(cell) => cell
                .as_datetime()
                .map(|ts| ts.duration_round(Duration::seconds(1)).unwrap_or(ts)),
            None => None,
        };

        data.push_row(
            line,
            &cell_text(columns.person),
            timestamp,
            &cell_text(columns.timestamp),
            &cell_text(columns.action),
        );
    }

    tracing::debug!(
        records = data.records.len(),
        skipped = data.skipped_rows,
        "loaded workbook"
    );

    Ok(data)
}

fn delimiter_byte(c: char) -> Result<u8, IngestError> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IngestError::InvalidDelimiter(c))
}

/// Positions of the three required columns.
struct Columns {
    person: usize,
    timestamp: usize,
    action: usize,
}

impl Columns {
    fn locate(headers: &[String], config: &Config) -> Result<Self, IngestError> {
        Ok(Self {
            person: column_index(headers, &config.person_column)?,
            timestamp: column_index(headers, &config.timestamp_column)?,
            action: column_index(headers, &config.action_column)?,
        })
    }
}

fn column_index(headers: &[String], column: &str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
        })
}

fn read_records<R: io::Read>(
    mut reader: csv::Reader<R>,
    config: &Config,
) -> Result<LoadedData, IngestError> {
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = Columns::locate(&headers, config)?;

    let mut data = LoadedData::default();

    for (row_num, result) in reader.byte_records().enumerate() {
        // Header is line 1
        let line = row_num + 2;

        let row = match csv::StringRecord::from_byte_record(result?) {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(line, error = %err, "skipping row that is not valid UTF-8");
                data.skip();
                continue;
            }
        };

        let raw_timestamp = row.get(columns.timestamp).unwrap_or("");
        data.push_row(
            line,
            row.get(columns.person).unwrap_or(""),
            parse_timestamp(raw_timestamp, &config.datetime_formats, &config.date_formats),
            raw_timestamp,
            row.get(columns.action).unwrap_or(""),
        );
    }

    tracing::debug!(
        records = data.records.len(),
        skipped = data.skipped_rows,
        "loaded export"
    );

    Ok(data)
}
