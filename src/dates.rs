//! Due date parsing.
//!
//! Accepted inputs:
//! - empty / whitespace: no due date
//! - `YYYY/MM/DD` or `YYYY-MM-DD`: local midnight of that calendar day
//! - an RFC 3339 timestamp

use chrono::format::ParseErrorKind;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};

/// Parse a due date. `Ok(None)` means "no due date".
pub fn parse_due_date(input: &str) -> Result<Option<DateTime<Utc>>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    let date = parse_calendar_date(input)?;
    Ok(Some(local_midnight(date)?))
}

fn parse_calendar_date(input: &str) -> Result<NaiveDate> {
    // chrono accepts unpadded fields; require the fixed-width form.
    let fixed_width = input.len() == 10
        && input
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == '/' || ch == '-');
    if !fixed_width {
        return Err(invalid_format(input));
    }
    let format = match input.as_bytes().get(4) {
        Some(b'/') => "%Y/%m/%d",
        _ => "%Y-%m-%d",
    };

    NaiveDate::parse_from_str(input, format).map_err(|err| match err.kind() {
        ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => {
            Error::InvalidArgument(format!("invalid date '{input}'"))
        }
        _ => invalid_format(input),
    })
}

fn invalid_format(input: &str) -> Error {
    Error::InvalidArgument(format!("invalid date format '{input}'; use YYYY/MM/DD"))
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        Error::OperationFailed(format!("cannot build midnight for {date}"))
    })?;
    // DST gaps can skip midnight; take the earliest valid instant of the day.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidArgument(format!("date {date} has no local midnight")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_means_no_due_date() {
        assert!(parse_due_date("").unwrap().is_none());
        assert!(parse_due_date("   ").unwrap().is_none());
    }

    #[test]
    fn accepts_both_separators() {
        let slash = parse_due_date("2026/02/28").unwrap().unwrap();
        let dash = parse_due_date("2026-02-28").unwrap().unwrap();
        assert_eq!(slash, dash);
        let local = slash.with_timezone(&Local);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(matches!(
            parse_due_date("2026/02/30"),
            Err(Error::InvalidArgument(msg)) if msg.contains("invalid date")
        ));
        assert!(parse_due_date("2026/13/01").is_err());
        assert!(matches!(
            parse_due_date("2027-02-29"),
            Err(Error::InvalidArgument(msg)) if msg == "invalid date '2027-02-29'"
        ));
    }

    #[test]
    fn leap_day_is_accepted_in_leap_years() {
        let parsed = parse_due_date("2028/02/29").unwrap().unwrap();
        assert_eq!(
            parsed.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2028, 2, 29).unwrap()
        );
    }

    #[test]
    fn rejects_other_formats() {
        for input in [
            "28/02/2026",
            "2026/2/28",
            "2026/2/028",
            "2026/02/ 8",
            "2026/02-28",
            "tomorrow",
            "2026/02/28/01",
        ] {
            assert!(parse_due_date(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn accepts_rfc3339() {
        let parsed = parse_due_date("2026-05-01T10:30:00Z").unwrap().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-05-01T10:30:00+00:00");
    }
}
