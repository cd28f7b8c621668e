//! Core domain logic for time-clock records.
//!
//! This crate contains:
//! - Pairing: matching clock-ins with clock-outs into shifts
//! - Classification: the coarse correct/incorrect pointage check
//! - Filtering by operator and date range
//! - Aggregation: per-person totals and per-day record counts

pub mod aggregate;
pub mod classify;
pub mod event;
pub mod filter;
pub mod pairing;

pub use aggregate::{DailyCount, MetricRow, PersonTotal, daily_counts, metric_rows, person_totals};
pub use classify::{PersonExtremes, PointageStatus, classify, divergences, person_extremes};
pub use event::{ClockAction, ClockEvent, PersonRecord, Shift, UnknownClockAction, round_hours};
pub use filter::{FilterError, RecordFilter};
pub use pairing::{
    PairingConfig, PairingError, PairingOutcome, PairingStep, pair_events, pair_person,
};
