//! Entry/exit pairing.
//!
//! Turns a person's clock events into shifts with a single left-to-right
//! scan holding at most one open entry.
//!
//! # Policy
//!
//! - A clock-in while an entry is open replaces it; the earlier entry is
//!   dropped ([`PairingStep::DiscardedOverlap`]).
//! - A clock-out more than [`PairingConfig::max_shift`] after the open entry
//!   closes the slot without producing a shift ([`PairingStep::DiscardedTooLong`]).
//! - A clock-out with no open entry is ignored ([`PairingStep::OrphanExit`]).
//! - An entry still open at end of data is reported as dangling.
//!
//! None of these are errors. The only error is a caller handing
//! [`pair_person`] a sequence that is empty, mixes persons, or is out of
//! timestamp order.

use chrono::{Duration, NaiveDateTime};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::event::{ClockAction, ClockEvent, Shift, round_hours};

/// Configuration for shift pairing.
#[derive(Debug, Clone)]
pub struct PairingConfig {
    /// Longest accepted entry-to-exit gap. Longer pairs are discarded.
    /// Default: 24 hours.
    pub max_shift: Duration,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            max_shift: Duration::hours(24),
        }
    }
}

impl PairingConfig {
    /// Builds a config with the cap expressed in whole hours.
    pub fn with_max_hours(hours: u32) -> Self {
        Self {
            max_shift: Duration::hours(i64::from(hours)),
        }
    }
}

/// Pairing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairingError {
    /// The event sequence handed to [`pair_person`] was not usable as-is.
    #[error("invalid pairing input for '{person}': {reason}")]
    InvalidPrecondition { person: String, reason: String },
}

/// What happened at one point of the scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairingStep {
    /// An entry matched with its exit.
    Paired(Shift),
    /// An open entry replaced by a later clock-in.
    DiscardedOverlap { entry: NaiveDateTime },
    /// A pair longer than the cap.
    DiscardedTooLong {
        entry: NaiveDateTime,
        exit: NaiveDateTime,
    },
    /// A clock-out with nothing open.
    OrphanExit { exit: NaiveDateTime },
    /// The entry still open when the data ran out.
    Dangling { entry: NaiveDateTime },
}

impl PairingStep {
    pub const fn is_anomaly(&self) -> bool {
        !matches!(self, Self::Paired(_))
    }
}

/// Pairing result for one person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingOutcome {
    pub person: String,
    /// The `Paired` steps, in scan order.
    pub shifts: Vec<Shift>,
    /// Every branch taken during the scan, in order.
    pub steps: Vec<PairingStep>,
    pub has_dangling_entry: bool,
}

impl PairingOutcome {
    /// Steps other than successful pairs.
    pub fn anomalies(&self) -> impl Iterator<Item = &PairingStep> {
        self.steps.iter().filter(|s| s.is_anomaly())
    }
}

/// Pairs the clock events of a single person.
///
/// `events` must be non-empty, belong to one person, and be sorted by
/// timestamp ascending (equal timestamps keep their given order). Anything
/// else is rejected with [`PairingError::InvalidPrecondition`].
pub fn pair_person(
    events: &[ClockEvent],
    config: &PairingConfig,
) -> Result<PairingOutcome, PairingError> {
    let Some(first) = events.first() else {
        return Err(PairingError::InvalidPrecondition {
            person: String::new(),
            reason: "empty event sequence".to_string(),
        });
    };

    for window in events.windows(2) {
        let (prev, next) = (&window[0], &window[1]);
        if next.person != first.person {
            return Err(PairingError::InvalidPrecondition {
                person: first.person.clone(),
                reason: format!("sequence also contains events for '{}'", next.person),
            });
        }
        if next.timestamp < prev.timestamp {
            return Err(PairingError::InvalidPrecondition {
                person: first.person.clone(),
                reason: format!(
                    "events out of order: {} after {}",
                    next.timestamp, prev.timestamp
                ),
            });
        }
    }

    Ok(scan(&first.person, events, config))
}

/// Pairs events for every person.
///
/// Input may be in any order: events are stably sorted by
/// `(person, timestamp)` first. Outcomes are returned sorted by person.
pub fn pair_events(events: &[ClockEvent], config: &PairingConfig) -> Vec<PairingOutcome> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| {
        a.person
            .cmp(&b.person)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let groups: Vec<&[ClockEvent]> = sorted.chunk_by(|a, b| a.person == b.person).collect();

    groups
        .par_iter()
        .map(|group| scan(&group[0].person, group, config))
        .collect()
}

/// The scan itself. Assumes the sequence is already valid.
#[allow(clippy::cast_precision_loss)]
fn scan(person: &str, events: &[ClockEvent], config: &PairingConfig) -> PairingOutcome {
    let mut pending: Option<NaiveDateTime> = None;
    let mut shifts = Vec::new();
    let mut steps = Vec::new();

    for event in events {
        match (event.action, pending) {
            (ClockAction::ClockIn, None) => {
                pending = Some(event.timestamp);
            }
            (ClockAction::ClockIn, Some(entry)) => {
                tracing::debug!(person, %entry, replaced_by = %event.timestamp, "overwriting open entry");
                steps.push(PairingStep::DiscardedOverlap { entry });
                pending = Some(event.timestamp);
            }
            (ClockAction::ClockOut, Some(entry)) => {
                let exit = event.timestamp;
                let delta = exit - entry;
                if delta <= config.max_shift {
                    let shift = Shift {
                        person: person.to_string(),
                        entry,
                        exit,
                        duration_hours: round_hours(delta.num_seconds() as f64 / 3600.0),
                    };
                    shifts.push(shift.clone());
                    steps.push(PairingStep::Paired(shift));
                } else {
                    tracing::debug!(person, %entry, %exit, "discarding pair over the shift cap");
                    steps.push(PairingStep::DiscardedTooLong { entry, exit });
                }
                pending = None;
            }
            (ClockAction::ClockOut, None) => {
                tracing::debug!(person, exit = %event.timestamp, "ignoring orphan clock-out");
                steps.push(PairingStep::OrphanExit {
                    exit: event.timestamp,
                });
            }
        }
    }

    if let Some(entry) = pending {
        steps.push(PairingStep::Dangling { entry });
    }

    PairingOutcome {
        person: person.to_string(),
        shifts,
        steps,
        has_dangling_entry: pending.is_some(),
    }
}
