//! Chronological ordering of flattened stage events.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::stages::Event;

/// An event date string that could not be parsed.
///
/// This is fatal for the affected bill's sync pass: substituting a guessed
/// date (epoch, "now") would silently corrupt the last-event lookup the
/// classifier depends on, so the caller gets the raw string back and
/// decides whether to skip, log, or retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable event date: {raw:?}")]
pub struct InvalidDateError {
    pub raw: String,
}

/// Parse an event date as emitted by the Sejm API.
///
/// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS` local datetime, or a bare
/// `YYYY-MM-DD` date (read as midnight). Anything else is an error.
pub fn parse_event_date(raw: &str) -> Result<NaiveDateTime, InvalidDateError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(InvalidDateError {
        raw: raw.to_string(),
    })
}

/// Sort events ascending by parsed date.
///
/// The sort is stable: events with identical dates keep the relative order
/// they had after flattening, so the whole pipeline is deterministic. Any
/// unparseable date aborts the sort for this event list — see
/// [`InvalidDateError`].
pub fn sort_by_date(events: Vec<Event>) -> Result<Vec<Event>, InvalidDateError> {
    let mut keyed = events
        .into_iter()
        .map(|event| parse_event_date(&event.event_date).map(|key| (key, event)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, event)| event).collect())
}
