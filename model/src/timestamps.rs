use chrono::{DateTime, Utc};

use crate::Timestamp;

/// Renders a chain timestamp (seconds) as `MM/DD/YYYY, hh:mm:ss AM` in UTC.
///
/// Timestamps outside the representable range are rendered as the raw number of seconds.
pub fn readable_timestamp(timestamp: Timestamp) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
        .map_or_else(
            || timestamp.to_string(),
            |date| date.format("%m/%d/%Y, %I:%M:%S %p").to_string(),
        )
}
