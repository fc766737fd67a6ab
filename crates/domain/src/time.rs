//! Time and timestamp helpers.

use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::WakeTimeParseError;

/// UTC instant used for "now" comparisons.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Timezone assumed for wake times that carry no explicit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The process's system timezone, resolved per value (DST aware).
    #[default]
    System,
    /// A fixed offset, mostly useful in tests.
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Attach this zone to a naive wall-clock time.
    ///
    /// Ambiguous times (autumn fold) resolve to the earlier instant.
    fn localize(self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::System => earliest(Local.from_local_datetime(naive)).map(|dt| dt.fixed_offset()),
            Self::Fixed(offset) => earliest(offset.from_local_datetime(naive)),
        }
    }
}

fn earliest<Tz: TimeZone>(result: LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>> {
    match result {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}

/// Parse a host-supplied wake time into a timezone-aware instant.
///
/// Accepts ISO-8601-like shapes with `T` or space separators, optional
/// fractional seconds, optional seconds, and a bare date. A trailing `Z`
/// means UTC. Values without an offset are placed in `zone`.
///
/// # Errors
///
/// Returns [`WakeTimeParseError::Unrecognised`] when no shape matches, or
/// [`WakeTimeParseError::NonexistentLocalTime`] when a naive value falls in
/// a daylight-saving gap of `zone`.
pub fn parse_wake_time(
    value: &str,
    zone: LocalZone,
) -> Result<DateTime<FixedOffset>, WakeTimeParseError> {
    let trimmed = value.trim();
    let raw = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::<FixedOffset>::parse_from_str(&raw, format) {
            return Ok(parsed);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| WakeTimeParseError::Unrecognised {
            input: value.to_string(),
        })?;

    zone.localize(&naive)
        .ok_or_else(|| WakeTimeParseError::NonexistentLocalTime {
            input: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn cet() -> LocalZone {
        LocalZone::Fixed(FixedOffset::east_opt(3600).unwrap())
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_iso_with_explicit_offset() {
        let parsed = parse_wake_time("2024-01-01T07:00:00+00:00", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T07:00:00Z"));
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn should_treat_trailing_z_as_utc() {
        let parsed = parse_wake_time("2024-01-01T07:00:00Z", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T07:00:00Z"));
    }

    #[test]
    fn should_parse_space_separator_with_compact_offset() {
        let parsed = parse_wake_time("2024-01-01 07:00:00+0200", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T05:00:00Z"));
    }

    #[test]
    fn should_parse_fractional_seconds() {
        let parsed = parse_wake_time("2024-01-01T07:00:00.250+00:00", cet()).unwrap();
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn should_assume_local_zone_when_offset_missing() {
        let parsed = parse_wake_time("2024-01-01T07:00:00", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T06:00:00Z"));
        assert_eq!(parsed.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn should_parse_host_style_datetime_without_offset() {
        let parsed = parse_wake_time("2024-01-01 07:00:00", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T06:00:00Z"));
    }

    #[test]
    fn should_parse_minute_precision() {
        let parsed = parse_wake_time("2024-01-01T07:30", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T06:30:00Z"));
    }

    #[test]
    fn should_parse_bare_date_as_local_midnight() {
        let parsed = parse_wake_time("2024-01-02", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T23:00:00Z"));
    }

    #[test]
    fn should_ignore_surrounding_whitespace() {
        let parsed = parse_wake_time("  2024-01-01T07:00:00+00:00\n", cet()).unwrap();
        assert_eq!(parsed, utc("2024-01-01T07:00:00Z"));
    }

    #[test]
    fn should_reject_garbage() {
        let err = parse_wake_time("not-a-date", cet()).unwrap_err();
        assert_eq!(
            err,
            WakeTimeParseError::Unrecognised {
                input: "not-a-date".to_string()
            }
        );
    }

    #[test]
    fn should_reject_empty_string() {
        assert!(parse_wake_time("", cet()).is_err());
    }

    #[test]
    fn should_reject_out_of_range_fields() {
        assert!(parse_wake_time("2024-13-01T07:00:00", cet()).is_err());
    }

    #[test]
    fn should_resolve_against_system_zone() {
        assert!(parse_wake_time("2024-06-15T12:00:00", LocalZone::System).is_ok());
    }
}
