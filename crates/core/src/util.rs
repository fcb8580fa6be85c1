use std::time::{SystemTime, UNIX_EPOCH};

/// Returns current unix epoch seconds.
pub fn now_unix() -> i64 {
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    dur.as_secs() as i64
}
