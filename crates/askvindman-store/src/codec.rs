//! Column encodings shared by the row mappers.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;

/// Current time at the precision we store (microseconds).
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so that string order is chronological order.
pub(crate) fn encode_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encoded_timestamps_sort_chronologically() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(100_000);
        let c = a + chrono::Duration::microseconds(120_000);
        assert!(encode_ts(&a) < encode_ts(&b));
        assert!(encode_ts(&b) < encode_ts(&c));
        assert_eq!(encode_ts(&a).len(), encode_ts(&c).len());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = now();
        assert_eq!(decode_ts(0, &encode_ts(&ts)).unwrap(), ts);
    }
}
