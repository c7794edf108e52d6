use std::time::{Duration, SystemTime};

/// Returns true if a resource last modified at `last_modified` is older than `max_age`.
///
/// A missing timestamp means there is nothing cached, which always counts as expired.
/// A missing `max_age` means cached data never expires.
pub fn has_expired(last_modified: Option<SystemTime>, max_age: Option<Duration>) -> bool {
    has_expired_at(last_modified, max_age, SystemTime::now())
}

/// Same as [`has_expired`], evaluated against the given `now`.
pub fn has_expired_at(last_modified: Option<SystemTime>, max_age: Option<Duration>, now: SystemTime) -> bool {
    let Some(last_modified) = last_modified else {
        return true;
    };
    let Some(max_age) = max_age else {
        return false;
    };
    // Timestamps from the future count as just modified
    let age = now.duration_since(last_modified).unwrap_or_default();
    age > max_age
}
