//! Monitor liveness helpers.

use chrono::{DateTime, Duration, Utc};

/// True when the last completed tick is older than `stale_after_secs`.
///
/// A missing heartbeat (monitor never ran) is always stale.
pub fn is_stale(heartbeat: Option<DateTime<Utc>>, now: DateTime<Utc>, stale_after_secs: i64) -> bool {
    match heartbeat {
        Some(ts) => now - ts > Duration::seconds(stale_after_secs),
        None => true,
    }
}
