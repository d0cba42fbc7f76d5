//! Display formatting
//!
//! Every formatter is total: absent or non-finite input renders as
//! [`PLACEHOLDER`].

use chrono::{DateTime, NaiveDateTime, Utc};

/// Shown for any field the upstream did not provide
pub const PLACEHOLDER: &str = "--";

/// Shown for metrics the upstream never reports
pub const NOT_AVAILABLE: &str = "N/A";

/// Upstream timestamp layout, always UTC
const BLOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Integer with en-US thousands separators: `800000` → `800,000`
pub fn format_number(value: Option<u64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| group_thousands(&v.to_string()))
}

/// USD amount with two decimals: `64000.5` → `$64,000.50`
pub fn format_usd(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Percentage with two decimals. The input is already a percentage:
/// `2.5` → `2.50%`
pub fn format_percentage(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.2}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Parse an upstream block time (`YYYY-MM-DD HH:MM:SS`, UTC; RFC 3339 accepted)
pub fn parse_block_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, BLOCK_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Coarse age of `then` relative to `now`: seconds, minutes, then hours
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds < 60 {
        return format!("{seconds} seconds ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    format!("{} hours ago", minutes / 60)
}

/// Age of a raw upstream block time, if it parses
pub fn block_age(raw: Option<&str>, now: DateTime<Utc>) -> Option<String> {
    raw.and_then(parse_block_time).map(|then| time_ago(then, now))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
