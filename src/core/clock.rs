//! Wall-clock helpers. Stored timestamps are Unix seconds as `f64`.

use chrono::{DateTime, Utc};

/// Current Unix time in seconds with millisecond precision.
pub fn unix_now() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Convert a stored Unix-seconds value back into a UTC timestamp.
pub fn to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_datetime() {
        let now = unix_now();
        let dt = to_datetime(now).unwrap();
        assert!((dt.timestamp_millis() as f64 / 1000.0 - now).abs() < 0.001);
    }
}
