//! Conversions between `created_at` REAL columns and `DateTime<Utc>`.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Unix seconds with sub-second precision.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

/// Inverse of [`to_unix_seconds`], at millisecond precision.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for non-finite or out-of-range values.
#[allow(clippy::cast_possible_truncation)]
pub fn from_unix_seconds(secs: f64) -> Result<DateTime<Utc>, DatabaseError> {
    if !secs.is_finite() {
        return Err(DatabaseError::InvalidState(format!(
            "created_at is not a finite number: {secs}"
        )));
    }
    let millis = (secs * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DatabaseError::InvalidState(format!("created_at out of range: {secs}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_at_millisecond_precision() {
        let at = DateTime::from_timestamp_millis(1_754_000_123_456).unwrap();
        assert_eq!(from_unix_seconds(to_unix_seconds(at)).unwrap(), at);
    }

    #[test]
    fn rejects_nan() {
        assert!(from_unix_seconds(f64::NAN).is_err());
    }
}
