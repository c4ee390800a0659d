//! Field normalizers for the raw strings found in statement exports.
//!
//! Both functions are total: they never error and never panic. An input that
//! cannot be normalized comes back as a sentinel (the trimmed input unchanged
//! for dates, `None` for amounts) so the preview screen can hold rows in a
//! temporarily invalid state while the user edits. Sentinels only become hard
//! errors at commit time.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static ISO_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("static regex"));
static ISO_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"));
static DAY_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[/\- ]([A-Za-z]+)[/\- ](\d{4}|\d{2})$").expect("static regex")
});
static MONTH_NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)[/\- ](\d{1,2})[/\- ](\d{4}|\d{2})$").expect("static regex")
});
static NUMERIC_MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[/\- ](\d{1,2})[/\- ](\d{4}|\d{2})$").expect("static regex")
});

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Maps a month name or abbreviation (at least three letters) to its number.
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}

/// Bank exports routinely shorten years to two digits.
fn expand_year(year: &str) -> String {
    if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    }
}

fn pad2(s: &str) -> String {
    if s.len() == 1 {
        format!("0{s}")
    } else {
        s.to_string()
    }
}

/// Normalizes a raw date string to `YYYY-MM-DD`, trying the conventions seen
/// in real exports in a fixed order. Returns the trimmed input unchanged when
/// nothing matches; callers check validity with [`is_valid_iso_date`].
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();

    // Already ISO, possibly with a time suffix or other trailing noise.
    if ISO_PREFIX.is_match(trimmed) {
        return trimmed[..10].to_string();
    }

    // 4-Mar-24, 4 Mar 2024
    if let Some(caps) = DAY_MONTH_NAME.captures(trimmed) {
        if let Some(month) = month_number(&caps[2]) {
            return format!("{}-{:02}-{}", expand_year(&caps[3]), month, pad2(&caps[1]));
        }
    }

    // Mar-4-24, March 4 2024
    if let Some(caps) = MONTH_NAME_DAY.captures(trimmed) {
        if let Some(month) = month_number(&caps[1]) {
            return format!("{}-{:02}-{}", expand_year(&caps[3]), month, pad2(&caps[2]));
        }
    }

    // 03/04/2024, 1-6-24 — month first, the US export convention.
    if let Some(caps) = NUMERIC_MONTH_FIRST.captures(trimmed) {
        return format!(
            "{}-{}-{}",
            expand_year(&caps[3]),
            pad2(&caps[1]),
            pad2(&caps[2])
        );
    }

    trimmed.to_string()
}

/// True iff `s` is exactly `YYYY-MM-DD` and names a real calendar date.
pub fn is_valid_iso_date(s: &str) -> bool {
    ISO_EXACT.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Normalizes a raw amount string to a signed decimal.
///
/// Accepts accounting-negative parentheses, currency symbols and thousands
/// separators. Parenthesization dominates sign: `(5)` and `(-5)` both come
/// back as `-5`. Returns `None` for anything that does not parse.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negative, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value.abs() } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ── normalize_date ────────────────────────────────────────────────────────

    #[test]
    fn iso_passes_through() {
        assert_eq!(normalize_date("2024-03-04"), "2024-03-04");
    }

    #[test]
    fn iso_with_time_suffix_is_truncated() {
        assert_eq!(normalize_date("2024-03-04T00:00"), "2024-03-04");
        assert_eq!(normalize_date(" 2024-03-04 12:30:00 "), "2024-03-04");
    }

    #[test]
    fn day_first_named_month() {
        assert_eq!(normalize_date("4-Mar-24"), "2024-03-04");
        assert_eq!(normalize_date("15 September 2023"), "2023-09-15");
    }

    #[test]
    fn month_first_named_month() {
        assert_eq!(normalize_date("Mar-4-24"), "2024-03-04");
        assert_eq!(normalize_date("March 4 2024"), "2024-03-04");
    }

    #[test]
    fn numeric_is_month_first() {
        assert_eq!(normalize_date("03/04/2024"), "2024-03-04");
        assert_eq!(normalize_date("1/6/24"), "2024-01-06");
        assert_eq!(normalize_date("1-6-2024"), "2024-01-06");
    }

    #[test]
    fn unknown_month_name_falls_through_unchanged() {
        assert_eq!(normalize_date("4-Xyz-24"), "4-Xyz-24");
    }

    #[test]
    fn unparsed_input_is_returned_trimmed() {
        assert_eq!(normalize_date("  not a date "), "not a date");
        assert!(!is_valid_iso_date(&normalize_date("not a date")));
    }

    #[test]
    fn out_of_range_numeric_normalizes_but_fails_validity() {
        let normalized = normalize_date("25/40/2024");
        assert_eq!(normalized, "2024-25-40");
        assert!(!is_valid_iso_date(&normalized));
    }

    // ── is_valid_iso_date ─────────────────────────────────────────────────────

    #[test]
    fn validity_requires_exact_shape_and_real_date() {
        assert!(is_valid_iso_date("2024-02-29"));
        assert!(!is_valid_iso_date("2023-02-29"));
        assert!(!is_valid_iso_date("2024-2-9"));
        assert!(!is_valid_iso_date("2024-03-04T00:00"));
    }

    // ── normalize_amount ──────────────────────────────────────────────────────

    #[test]
    fn plain_and_symbol_amounts() {
        assert_eq!(normalize_amount("42.00"), Some(dec("42.00")));
        assert_eq!(normalize_amount("$42.00"), Some(dec("42.00")));
        assert_eq!(normalize_amount("-50"), Some(dec("-50")));
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(normalize_amount("1,234.56"), Some(dec("1234.56")));
    }

    #[test]
    fn accounting_parentheses_negate() {
        assert_eq!(normalize_amount("(1,234.50)"), Some(dec("-1234.50")));
        assert_eq!(normalize_amount("($75.25)"), Some(dec("-75.25")));
    }

    #[test]
    fn parentheses_dominate_a_stray_minus() {
        assert_eq!(normalize_amount("(-5.00)"), Some(dec("-5.00")));
    }

    #[test]
    fn unparsable_amounts_are_none() {
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("   "), None);
        assert_eq!(normalize_amount("abc"), None);
        assert_eq!(normalize_amount("()"), None);
        assert_eq!(normalize_amount("1.2.3"), None);
    }

    #[test]
    fn zero_parses_as_zero() {
        assert_eq!(normalize_amount("0.00"), Some(dec("0.00")));
    }
}
