//! Time helpers shared by entities and services.
//!
//! Every predicate takes `now` explicitly so that callers (and tests) can
//! evaluate it against a simulated clock; the `*_now` style wrappers on the
//! entity models just pass [`Utc::now`].

use chrono::{DateTime, Duration, Utc};

/// Number of days a shadow row stays in the recent-activity index.
pub const MONTH_WINDOW_DAYS: i64 = 30;

/// Format used by the Graph API for timestamps, without the offset suffix.
pub const REMOTE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Cooldown between two refreshes guarded by the same gate.
#[must_use]
pub fn refresh_cooldown() -> Duration {
    Duration::days(1)
}

/// Retention window of the recent-activity shadow index.
#[must_use]
pub fn month_window() -> Duration {
    Duration::days(MONTH_WINDOW_DAYS)
}

/// Render the time elapsed between `since` and `now` in its largest unit.
///
/// Returns `"<n>days"`, `"<n>hours"`, `"<n>mins"` or `"<n>secs"`, truncating
/// to whole units. A zero or negative interval renders as `"0secs"`.
pub fn format_elapsed(since: impl Into<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let secs = (now - since.into()).num_seconds();
    if secs <= 0 {
        return "0secs".to_string();
    }

    let days = secs / 86_400;
    let hours = secs / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{days}days")
    } else if hours > 0 {
        format!("{hours}hours")
    } else if minutes > 0 {
        format!("{minutes}mins")
    } else {
        format!("{}secs", secs % 60)
    }
}

/// [`format_elapsed`] against the current clock.
pub fn get_different_time(since: impl Into<DateTime<Utc>>) -> String {
    format_elapsed(since, Utc::now())
}

/// Check whether a stored timestamp differs from a remote one.
///
/// The remote value is an ISO-8601 string such as `2015-10-01T12:00:00+0000`;
/// everything from the first `+` is discarded and the rest is compared with
/// the stored time at second granularity in UTC.
pub fn differs_from_remote(stored: impl Into<DateTime<Utc>>, remote: &str) -> bool {
    let remote = remote.split_once('+').map_or(remote, |(head, _)| head);
    stored.into().format(REMOTE_TIME_FORMAT).to_string() != remote
}

/// Cooldown predicate: true once at least `cooldown` has passed since `last`.
pub fn is_due(last: impl Into<DateTime<Utc>>, now: DateTime<Utc>, cooldown: Duration) -> bool {
    now - last.into() >= cooldown
}

/// True when more than `days` whole days separate `created` and `now`.
pub fn is_older_than_days(created: impl Into<DateTime<Utc>>, now: DateTime<Utc>, days: i64) -> bool {
    (now - created.into()).num_days() > days
}

/// Compact rendering of a counter: values above 1000 become `"<n/1000>K"`.
#[must_use]
pub fn compact_count(number: i64) -> String {
    if number > 1000 {
        format!("{}K", number / 1000)
    } else {
        number.to_string()
    }
}
