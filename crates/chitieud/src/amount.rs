//! Amount normalization for Vietnamese-style magnitude suffixes.
//!
//! "50k", "1.2tr", "200 nghìn" all normalize to a VND value at
//! thousand-unit granularity. This mirrors the arithmetic the oracle is
//! instructed to perform, so it can re-derive amounts the oracle missed.

use once_cell::sync::Lazy;
use regex::Regex;

/// First numeral with an optional magnitude suffix. Grouped digits
/// ("50.000.000") are tried before the plain/decimal form, and longer
/// suffixes come first so "triệu" is not consumed as "tr" + trailing text.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d{1,3}(?:[.,]\d{3})+|\d+(?:[.,]\d+)?)\s*(triệu|trieu|tr|nghìn|nghin|ngàn|ngan|đồng|dong|vnd|k|đ)?",
    )
    .expect("amount regex is valid")
});

/// Largest value representable after scaling back to whole đồng.
const MAX_THOUSANDS: f64 = (i64::MAX / 1000) as f64;

/// Round to the nearest thousand. Non-finite values and values whose
/// rounded thousands would overflow `i64` are rejected, never wrapped.
pub fn round_to_thousand(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let thousands = (value / 1000.0).round();
    if thousands.abs() > MAX_THOUSANDS {
        return None;
    }
    Some(thousands as i64 * 1000)
}

/// Parse the base numeral. Separators followed by three-digit groups are
/// grouping separators ("50.000" = 50000, "50.000.000" = 50000000); a
/// single separator with any other width is a decimal point ("1.2" = 1.2).
fn parse_base(token: &str) -> f64 {
    let parts: Vec<&str> = token.split(['.', ',']).collect();
    if parts.len() > 1 && parts[1..].iter().all(|group| group.len() == 3) {
        parts.concat().parse().unwrap_or(0.0)
    } else if parts.len() == 2 {
        format!("{}.{}", parts[0], parts[1]).parse().unwrap_or(0.0)
    } else {
        parts.concat().parse().unwrap_or(0.0)
    }
}

fn suffix_multiplier(suffix: &str) -> f64 {
    match suffix.to_lowercase().as_str() {
        "k" | "nghìn" | "nghin" | "ngàn" | "ngan" => 1_000.0,
        "tr" | "triệu" | "trieu" => 1_000_000.0,
        // bare number, "đồng", "vnd", "đ"
        _ => 1.0,
    }
}

/// Locate and normalize the first monetary expression in `text`.
///
/// Returns `None` when no numeral can be found or when the numeral rounds
/// to zero (a bare small number is a count, not money); an unresolvable
/// amount is a terminal condition for an add request, never a zero value.
pub fn normalize_amount(text: &str) -> Option<i64> {
    let caps = AMOUNT_RE.captures(text)?;
    let base = parse_base(caps.get(1)?.as_str());
    let multiplier = caps
        .get(2)
        .map(|m| suffix_multiplier(m.as_str()))
        .unwrap_or(1.0);
    round_to_thousand(base * multiplier).filter(|v| *v > 0)
}
