//! Display formatting for dashboard values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Parse a gateway date into a calendar date.
///
/// Accepts plain `YYYY-MM-DD` dates and timestamps (RFC 3339 or naive ISO
/// 8601), keeping only the date part. Anything else is `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|timestamp| timestamp.date())
        .ok()
}

/// `Oct 19, 2026`
pub fn format_medium_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Oct 19`
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Whole-rupiah amount with `.` grouping: `Rp 1.500.000` (non-breaking space).
pub fn format_idr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}Rp\u{a0}{grouped}")
}

/// Euro amount rounded to cents: `€149.50`.
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() {
        format!("-€{:.2}", rounded.abs())
    } else {
        format!("€{:.2}", rounded)
    }
}

/// `mailto:` link with an optional percent-encoded subject.
pub fn mailto(address: &str, subject: Option<&str>) -> String {
    match subject {
        Some(subject) => format!("mailto:{}?subject={}", address, urlencoding::encode(subject)),
        None => format!("mailto:{}", address),
    }
}

/// Initials avatar image for `seed`.
pub fn avatar_url(base_url: &str, seed: &str) -> String {
    format!(
        "{}?seed={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(seed)
    )
}
