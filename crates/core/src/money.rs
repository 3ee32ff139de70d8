//! Decimal <-> smallest-unit conversions for display and input.
//!
//! Amounts are stored as `u64` cents everywhere; these helpers only exist at
//! the edges (prompts, CLI input and output).

use crate::{DomainError, DomainResult};

/// `2999` -> `"29.99"`.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Signed variant, e.g. for gross profit.
pub fn format_signed_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}{}", format_cents(cents.unsigned_abs()))
}

/// Parse `"29.99"`, `"29.9"`, `"29"` or `"$29.99"` into cents.
///
/// At most two fractional digits; no sign, no thousands separators.
pub fn parse_cents(input: &str) -> DomainResult<u64> {
    let invalid = || DomainError::validation(format!("invalid amount '{input}'"));

    let s = input.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || frac.len() > 2
    {
        return Err(invalid());
    }

    let units: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: u64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(invalid)
}
