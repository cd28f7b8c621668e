//! Coarse per-person pointage check.
//!
//! A person is "correct" when they have at least one clock-in and at least
//! one clock-out anywhere in the data. The check looks only at the last
//! clock-in and the first clock-out, never at how events pair up, so it can
//! disagree with [`crate::pairing`]: someone whose only pair was over the
//! shift cap is correct here but has no shifts there. [`divergences`] lists
//! those persons; the two notions are deliberately left separate.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::{ClockAction, ClockEvent};
use crate::pairing::PairingOutcome;

/// Extreme clock times for one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersonExtremes {
    pub last_clock_in: Option<NaiveDateTime>,
    pub first_clock_out: Option<NaiveDateTime>,
}

impl PersonExtremes {
    pub const fn is_complete(&self) -> bool {
        self.last_clock_in.is_some() && self.first_clock_out.is_some()
    }
}

/// Partition of all persons into correct and incorrect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PointageStatus {
    pub correct: BTreeSet<String>,
    pub incorrect: BTreeSet<String>,
}

impl PointageStatus {
    pub fn is_correct(&self, person: &str) -> bool {
        self.correct.contains(person)
    }

    pub fn len(&self) -> usize {
        self.correct.len() + self.incorrect.len()
    }

    pub fn is_empty(&self) -> bool {
        self.correct.is_empty() && self.incorrect.is_empty()
    }
}

/// Computes the last clock-in and first clock-out of every person.
///
/// Input order does not matter.
pub fn person_extremes(events: &[ClockEvent]) -> BTreeMap<String, PersonExtremes> {
    let mut extremes: BTreeMap<String, PersonExtremes> = BTreeMap::new();

    for event in events {
        let entry = extremes.entry(event.person.clone()).or_default();
        match event.action {
            ClockAction::ClockIn => {
                entry.last_clock_in = entry.last_clock_in.max(Some(event.timestamp));
            }
            ClockAction::ClockOut => {
                entry.first_clock_out = Some(
                    entry
                        .first_clock_out
                        .map_or(event.timestamp, |t| t.min(event.timestamp)),
                );
            }
        }
    }

    extremes
}

/// Splits every person seen in `events` into correct and incorrect.
pub fn classify(events: &[ClockEvent]) -> PointageStatus {
    let mut status = PointageStatus::default();

    for (person, extremes) in person_extremes(events) {
        if extremes.is_complete() {
            status.correct.insert(person);
        } else {
            status.incorrect.insert(person);
        }
    }

    status
}

/// Persons classified correct for whom pairing produced no shift.
pub fn divergences(outcomes: &[PairingOutcome], status: &PointageStatus) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| o.shifts.is_empty() && status.is_correct(&o.person))
        .map(|o| o.person.clone())
        .collect()
}
