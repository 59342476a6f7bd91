use chrono::{DateTime, Duration, Utc};

/// Current time at millisecond precision, the resolution BSON dates keep.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// A fresh `updatedAt` that is strictly later than `previous`, even when the
/// clock has not moved past it.
pub fn next_update(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now_millis();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
