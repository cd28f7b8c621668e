//! Timesheet command.
//!
//! Prints every operator's shifts in order, the pairing anomalies met along
//! the way, and the operator's total.

use std::io::Write;

use anyhow::Result;
use pt_core::{PairingConfig, PairingOutcome, PairingStep, pair_events, person_totals};

use crate::commands::util::{Dataset, format_hours, format_timestamp, section_header};

/// Writes the human-readable timesheet.
pub fn write_timesheet<W: Write>(writer: &mut W, outcomes: &[PairingOutcome]) -> Result<()> {
    writeln!(writer, "{}", section_header("TIMESHEET"))?;

    if outcomes.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No clock events in the selection.")?;
        return Ok(());
    }

    let totals = person_totals(outcomes);
    for (outcome, total) in outcomes.iter().zip(&totals) {
        writeln!(writer)?;
        writeln!(writer, "{}", outcome.person)?;

        if outcome.shifts.is_empty() {
            writeln!(writer, "  (no shifts)")?;
        }
        for shift in &outcome.shifts {
            writeln!(
                writer,
                "  {} → {}  {:>7}",
                format_timestamp(shift.entry),
                format_timestamp(shift.exit),
                format_hours(shift.duration_hours)
            )?;
        }

        for step in outcome.anomalies() {
            writeln!(writer, "  ! {}", describe_anomaly(step))?;
        }

        let noun = if total.shift_count == 1 {
            "shift"
        } else {
            "shifts"
        };
        writeln!(
            writer,
            "  Total: {} ({} {noun})",
            format_hours(total.total_hours),
            total.shift_count
        )?;
    }

    Ok(())
}

fn describe_anomaly(step: &PairingStep) -> String {
    match step {
        PairingStep::Paired(shift) => format!(
            "paired {} → {}",
            format_timestamp(shift.entry),
            format_timestamp(shift.exit)
        ),
        PairingStep::DiscardedOverlap { entry } => {
            format!("entry {} replaced by a later clock-in", format_timestamp(*entry))
        }
        PairingStep::DiscardedTooLong { entry, exit } => format!(
            "pair {} → {} exceeds the shift cap",
            format_timestamp(*entry),
            format_timestamp(*exit)
        ),
        PairingStep::OrphanExit { exit } => {
            format!("clock-out {} without entry", format_timestamp(*exit))
        }
        PairingStep::Dangling { entry } => {
            format!("entry {} still open", format_timestamp(*entry))
        }
    }
}

/// Runs the pair command.
pub fn run<W: Write>(
    writer: &mut W,
    dataset: &Dataset,
    config: &PairingConfig,
    json: bool,
) -> Result<()> {
    let outcomes = pair_events(&dataset.events, config);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&outcomes)?)?;
    } else {
        write_timesheet(writer, &outcomes)?;
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

    fn render(events: Vec<ClockEvent>) -> String {
        let dataset = Dataset {
            events,
            ..Dataset::default()
        };
        let mut output = Vec::new();
        run(&mut output, &dataset, &PairingConfig::default(), false).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_timesheet_empty() {
        let output = render(vec![]);
        assert_snapshot!(output, @r"
        TIMESHEET
        ─────────

        No clock events in the selection.
        ");
    }

    #[test]
    fn test_timesheet_with_anomalies() {
        let output = render(vec![
            ev("A", ClockAction::ClockIn, "2025-01-10 08:00"),
            ev("A", ClockAction::ClockOut, "2025-01-10 16:30"),
            ev("B", ClockAction::ClockIn, "2025-01-10 22:00"),
            ev("B", ClockAction::ClockOut, "2025-01-11 06:00"),
            ev("B", ClockAction::ClockOut, "2025-01-11 06:05"),
            ev("C", ClockAction::ClockIn, "2025-01-10 07:00"),
            ev("C", ClockAction::ClockIn, "2025-01-10 08:00"),
        ]);

        assert_snapshot!(output, @r"
        TIMESHEET
        ─────────

        A
          2025-01-10 08:00 → 2025-01-10 16:30    8.50h
          Total: 8.50h (1 shift)

        B
          2025-01-10 22:00 → 2025-01-11 06:00    8.00h
          ! clock-out 2025-01-11 06:05 without entry
          Total: 8.00h (1 shift)

        C
          (no shifts)
          ! entry 2025-01-10 07:00 replaced by a later clock-in
          ! entry 2025-01-10 08:00 still open
          Total: 0.00h (0 shifts)
        ");
    }

    #[test]
    fn test_json_output_lists_steps() {
        let dataset = Dataset {
            events: vec![
                ev("A", ClockAction::ClockIn, "2025-01-10 08:00"),
                ev("A", ClockAction::ClockOut, "2025-01-12 08:00"),
            ],
            ..Dataset::default()
        };
        let mut output = Vec::new();
        run(&mut output, &dataset, &PairingConfig::default(), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value[0]["person"], "A");
        assert_eq!(value[0]["shifts"].as_array().unwrap().len(), 0);
        assert_eq!(value[0]["has_dangling_entry"], false);
        assert_eq!(value[0]["steps"][0]["kind"], "discarded_too_long");
    }
}
