//! # Timestamp Codec
//!
//! Rental timestamps are stored as TEXT in a fixed-width RFC 3339 form:
//!
//! ```text
//! 2026-10-18T09:30:00.000000Z
//! └──── date ┘└─ time ┘└ µs ┘└ UTC
//! ```
//!
//! Fixed width keeps string order equal to time order, and microsecond
//! precision is kept end to end: values are truncated with [`truncate`]
//! before they are used, so what a caller holds is exactly what
//! [`decode`] will return later.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Digits of sub-second precision that survive a round trip.
pub const PRECISION_DIGITS: u16 = 6;

/// Drops sub-microsecond precision.
#[inline]
pub fn truncate(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(PRECISION_DIGITS)
}

/// Formats an instant for storage.
pub fn encode(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored instant.
pub fn decode(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|instant| instant.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_encode_format() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(encode(instant), "2026-10-18T09:30:00.000000Z");
    }

    #[test]
    fn test_round_trip_after_truncate() {
        let instant = truncate(Utc::now());
        assert_eq!(decode(&encode(instant)).unwrap(), instant);
    }

    #[test]
    fn test_truncate_drops_nanoseconds() {
        let base = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let instant = base + Duration::nanoseconds(1_234_567);
        assert_eq!(truncate(instant), base + Duration::microseconds(1_234));
    }

    #[test]
    fn test_encoded_order_matches_time_order() {
        let a = Utc.with_ymd_and_hms(2026, 10, 18, 9, 59, 59).unwrap() + Duration::microseconds(999_999);
        let b = Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();
        assert!(encode(a) < encode(b));
    }

    #[test]
    fn test_decode_accepts_offsets() {
        let parsed = decode("2026-10-18T11:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap());
        assert!(decode("yesterday").is_err());
    }
}
