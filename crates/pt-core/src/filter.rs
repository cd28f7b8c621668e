//! Operator and date-range filtering.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::event::PersonRecord;

/// Filter construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The start date is after the end date.
    #[error("date range is inverted: {from} is after {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },
}

/// Selects records by person and inclusive calendar-date bounds.
///
/// An empty person set selects everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    persons: BTreeSet<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn new<I, S>(
        persons: I,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(FilterError::InvertedRange { from, to });
            }
        }

        Ok(Self {
            persons: persons.into_iter().map(Into::into).collect(),
            from,
            to,
        })
    }

    /// Whether a record for `person` at `timestamp` passes the filter.
    pub fn matches(&self, person: &str, timestamp: NaiveDateTime) -> bool {
        if !self.persons.is_empty() && !self.persons.contains(person) {
            return false;
        }
        let date = timestamp.date();
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Returns the records that pass the filter, in input order.
    pub fn apply<R: PersonRecord + Clone>(&self, records: &[R]) -> Vec<R> {
        records
            .iter()
            .filter(|r| self.matches(r.person(), r.timestamp()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ClockAction, ClockEvent};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ev(person: &str, at: &str) -> ClockEvent {
        ClockEvent::new(
            person,
            NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").unwrap(),
            ClockAction::ClockIn,
        )
    }

    fn sample() -> Vec<ClockEvent> {
        vec![
            ev("A", "2025-01-09 08:00"),
            ev("A", "2025-01-10 23:59"),
            ev("B", "2025-01-10 08:00"),
            ev("B", "2025-01-11 00:00"),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let filter = RecordFilter::default();
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_person_filter() {
        let filter = RecordFilter::new(["B"], None, None).unwrap();
        let kept = filter.apply(&sample());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.person == "B"));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = RecordFilter::new(
            Vec::<String>::new(),
            Some(date("2025-01-10")),
            Some(date("2025-01-10")),
        )
        .unwrap();
        let kept = filter.apply(&sample());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].person, "A");
        assert_eq!(kept[1].person, "B");
    }

    #[test]
    fn test_open_ended_range() {
        let filter =
            RecordFilter::new(Vec::<String>::new(), Some(date("2025-01-11")), None).unwrap();
        assert_eq!(filter.apply(&sample()).len(), 1);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = RecordFilter::new(
            Vec::<String>::new(),
            Some(date("2025-01-11")),
            Some(date("2025-01-10")),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "date range is inverted: 2025-01-11 is after 2025-01-10"
        );
    }
}
