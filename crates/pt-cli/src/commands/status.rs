//! Status command for listing correct and incorrect pointages.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use pt_core::{PairingConfig, PointageStatus, classify, divergences, pair_events};
use serde::Serialize;

use crate::commands::util::{Dataset, section_header};

/// JSON status structure.
#[derive(Debug, Serialize)]
pub struct JsonStatus<'a> {
    pub correct: &'a BTreeSet<String>,
    pub incorrect: &'a BTreeSet<String>,
    /// Correct operators for whom pairing found no shift.
    pub without_shifts: &'a [String],
}

fn write_list<W: Write>(writer: &mut W, title: &str, names: &[&str]) -> Result<()> {
    writeln!(writer, "{title} ({}):", names.len())?;
    if names.is_empty() {
        writeln!(writer, "  (none)")?;
    }
    for name in names {
        writeln!(writer, "  - {name}")?;
    }
    Ok(())
}

/// Writes the human-readable status listing.
pub fn write_status<W: Write>(
    writer: &mut W,
    status: &PointageStatus,
    without_shifts: &[String],
) -> Result<()> {
    writeln!(writer, "{}", section_header("POINTAGE STATUS"))?;

    if status.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No clock events in the selection.")?;
        return Ok(());
    }

    let correct: Vec<&str> = status.correct.iter().map(String::as_str).collect();
    let incorrect: Vec<&str> = status.incorrect.iter().map(String::as_str).collect();

    writeln!(writer)?;
    write_list(writer, "Correct", &correct)?;
    writeln!(writer)?;
    write_list(writer, "Incorrect", &incorrect)?;

    if !without_shifts.is_empty() {
        let names: Vec<&str> = without_shifts.iter().map(String::as_str).collect();
        writeln!(writer)?;
        write_list(writer, "Correct but without a paired shift", &names)?;
    }

    Ok(())
}

/// Runs the status command.
pub fn run<W: Write>(
    writer: &mut W,
    dataset: &Dataset,
    config: &PairingConfig,
    json: bool,
) -> Result<()> {
    let status = classify(&dataset.events);
    let outcomes = pair_events(&dataset.events, config);
    let without_shifts = divergences(&outcomes, &status);

    if json {
        let report = JsonStatus {
            correct: &status.correct,
            incorrect: &status.incorrect,
            without_shifts: &without_shifts,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_status(writer, &status, &without_shifts)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;
    use insta::assert_snapshot;
    use pt_core::{ClockAction, ClockEvent};

    fn ev(person: &str, action: ClockAction, at: &str) -> ClockEvent {
        ClockEvent::new(
            person,
            NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").unwrap(),
            action,
        )
    }

    fn dataset() -> Dataset {
        Dataset {
            events: vec![
                ev("Alice", ClockAction::ClockIn, "2025-01-10 08:00"),
                ev("Alice", ClockAction::ClockOut, "2025-01-10 16:00"),
                ev("Bob", ClockAction::ClockIn, "2025-01-10 08:00"),
                ev("Chloé", ClockAction::ClockIn, "2025-01-10 08:00"),
                ev("Chloé", ClockAction::ClockOut, "2025-01-12 09:00"),
            ],
            ..Dataset::default()
        }
    }

    #[test]
    fn test_status_listing() {
        let mut output = Vec::new();
        run(&mut output, &dataset(), &PairingConfig::default(), false).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        POINTAGE STATUS
        ───────────────

        Correct (2):
          - Alice
          - Chloé

        Incorrect (1):
          - Bob

        Correct but without a paired shift (1):
          - Chloé
        ");
    }

    #[test]
    fn test_status_json() {
        let mut output = Vec::new();
        run(&mut output, &dataset(), &PairingConfig::default(), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["correct"], serde_json::json!(["Alice", "Chloé"]));
        assert_eq!(value["incorrect"], serde_json::json!(["Bob"]));
        assert_eq!(value["without_shifts"], serde_json::json!(["Chloé"]));
    }

    #[test]
    fn test_status_empty() {
        let mut output = Vec::new();
        run(&mut output, &Dataset::default(), &PairingConfig::default(), false).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("No clock events in the selection."));
    }
}
