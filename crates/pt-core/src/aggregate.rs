//! Per-person totals and per-day record counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::{PersonRecord, round_hours};
use crate::pairing::PairingOutcome;

/// Summed shift time for one person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonTotal {
    pub person: String,
    pub shift_count: usize,
    pub total_hours: f64,
    /// Mean shift length; 0.0 when there are no shifts.
    pub average_hours: f64,
    pub dangling: bool,
}

/// Number of records for a person on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub person: String,
    pub count: usize,
}

/// One cell of the flat export table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub person: String,
    pub metric: &'static str,
    pub value: f64,
}

/// Sums shift durations per outcome, keeping outcome order.
#[allow(clippy::cast_precision_loss)]
pub fn person_totals(outcomes: &[PairingOutcome]) -> Vec<PersonTotal> {
    outcomes
        .iter()
        .map(|outcome| {
            let shift_count = outcome.shifts.len();
            // f64 `Sum` starts at -0.0
            let total = outcome
                .shifts
                .iter()
                .fold(0.0, |acc, s| acc + s.duration_hours);
            let average = if shift_count == 0 {
                0.0
            } else {
                total / shift_count as f64
            };
            PersonTotal {
                person: outcome.person.clone(),
                shift_count,
                total_hours: round_hours(total),
                average_hours: round_hours(average),
                dangling: outcome.has_dangling_entry,
            }
        })
        .collect()
}

/// Counts records per `(date, person)`, ordered by date then person.
pub fn daily_counts<R: PersonRecord>(records: &[R]) -> Vec<DailyCount> {
    let mut counts: BTreeMap<(NaiveDate, &str), usize> = BTreeMap::new();
    for record in records {
        *counts
            .entry((record.timestamp().date(), record.person()))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((date, person), count)| DailyCount {
            date,
            person: person.to_string(),
            count,
        })
        .collect()
}

/// Flattens totals into `{person, metric, value}` rows.
#[allow(clippy::cast_precision_loss)]
pub fn metric_rows(totals: &[PersonTotal]) -> Vec<MetricRow> {
    let mut rows = Vec::with_capacity(totals.len() * 4);
    for total in totals {
        let person = &total.person;
        rows.push(MetricRow {
            person: person.clone(),
            metric: "shifts",
            value: total.shift_count as f64,
        });
        rows.push(MetricRow {
            person: person.clone(),
            metric: "total_hours",
            value: total.total_hours,
        });
        rows.push(MetricRow {
            person: person.clone(),
            metric: "average_hours",
            value: total.average_hours,
        });
        rows.push(MetricRow {
            person: person.clone(),
            metric: "dangling",
            value: if total.dangling { 1.0 } else { 0.0 },
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ClockAction, ClockEvent};
    use crate::pairing::{PairingConfig, pair_events};
    use chrono::NaiveDateTime;

    fn ev(person: &str, action: ClockAction, at: &str) -> ClockEvent {
        ClockEvent::new(
            person,
            NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").unwrap(),
            action,
        )
    }

    fn week() -> Vec<ClockEvent> {
        vec![
            ev("A", ClockAction::ClockIn, "2025-01-10 08:00"),
            ev("A", ClockAction::ClockOut, "2025-01-10 16:30"),
            ev("A", ClockAction::ClockIn, "2025-01-11 08:00"),
            ev("A", ClockAction::ClockOut, "2025-01-11 15:30"),
            ev("B", ClockAction::ClockIn, "2025-01-10 09:00"),
        ]
    }

    #[test]
    fn test_person_totals() {
        let outcomes = pair_events(&week(), &PairingConfig::default());
        let totals = person_totals(&outcomes);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].person, "A");
        assert_eq!(totals[0].shift_count, 2);
        // 8.5 + 7.5
        assert!((totals[0].total_hours - 16.0).abs() < 1e-9);
        assert!((totals[0].average_hours - 8.0).abs() < 1e-9);
        assert!(!totals[0].dangling);

        assert_eq!(totals[1].shift_count, 0);
        assert!(totals[1].average_hours.abs() < f64::EPSILON);
        assert!(totals[1].dangling);
    }

    #[test]
    fn test_zero_shift_total_is_positive_zero() {
        let outcomes = pair_events(
            &[ev("B", ClockAction::ClockIn, "2025-01-10 09:00")],
            &PairingConfig::default(),
        );
        let totals = person_totals(&outcomes);

        assert!(totals[0].total_hours.is_sign_positive());
        assert!(totals[0].average_hours.is_sign_positive());

        let rows = metric_rows(&totals);
        assert_eq!(rows[1].value.to_string(), "0");
    }

    #[test]
    fn test_daily_counts() {
        let counts = daily_counts(&week());

        assert_eq!(
            counts
                .iter()
                .map(|c| (c.date.to_string(), c.person.as_str(), c.count))
                .collect::<Vec<_>>(),
            vec![
                ("2025-01-10".to_string(), "A", 2),
                ("2025-01-10".to_string(), "B", 1),
                ("2025-01-11".to_string(), "A", 2),
            ]
        );
    }

    #[test]
    fn test_metric_rows() {
        let outcomes = pair_events(&week(), &PairingConfig::default());
        let rows = metric_rows(&person_totals(&outcomes));

        assert_eq!(rows.len(), 8);
        let metrics: Vec<_> = rows.iter().take(4).map(|r| r.metric).collect();
        assert_eq!(
            metrics,
            vec!["shifts", "total_hours", "average_hours", "dangling"]
        );
        assert!((rows[7].value - 1.0).abs() < f64::EPSILON);
    }
}
