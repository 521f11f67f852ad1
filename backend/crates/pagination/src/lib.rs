//! Page and limit primitives for offset-paginated listings.
//!
//! Listing endpoints accept loosely-typed `page` and `limit` query values.
//! This crate normalises them leniently and provides the offset arithmetic
//! shared by every paginated read.

/// Limit applied when a caller supplies a non-positive value.
pub const DEFAULT_LIMIT: u32 = 20;

/// Upper bound for any requested page size.
pub const MAX_LIMIT: u32 = 100;

/// Parse a `limit` query value.
///
/// Absent or non-numeric input yields `fallback`; non-positive values yield
/// [`DEFAULT_LIMIT`]; anything above [`MAX_LIMIT`] is clamped.
///
/// # Examples
/// ```
/// use pagination::{parse_limit, DEFAULT_LIMIT, MAX_LIMIT};
///
/// assert_eq!(parse_limit(None, 10), 10);
/// assert_eq!(parse_limit(Some("0"), 10), DEFAULT_LIMIT);
/// assert_eq!(parse_limit(Some("500"), 10), MAX_LIMIT);
/// ```
#[must_use]
pub fn parse_limit(raw: Option<&str>, fallback: u32) -> u32 {
    let Some(parsed) = raw.and_then(|value| value.trim().parse::<i64>().ok()) else {
        return fallback;
    };
    if parsed <= 0 {
        return DEFAULT_LIMIT;
    }
    u32::try_from(parsed).map_or(MAX_LIMIT, |limit| limit.min(MAX_LIMIT))
}

/// Parse a one-based `page` query value, defaulting to the first page.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Offset for a one-based page: `max(0, (page - 1) * limit)`.
#[must_use]
pub const fn calc_skip(page: u32, limit: u32) -> u64 {
    (page.saturating_sub(1) as u64).saturating_mul(limit as u64)
}

/// Number of pages needed to show `total` records, `ceil(total / limit)`.
///
/// A zero `limit` yields zero pages rather than dividing by zero.
#[must_use]
pub const fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page arithmetic and query parsing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first_page(1, 10, 0)]
    #[case::third_page(3, 10, 20)]
    #[case::page_zero_clamps(0, 10, 0)]
    #[case::fill_pass_shape(4, 7, 21)]
    fn calc_skip_matches_offset_formula(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: u64,
    ) {
        assert_eq!(calc_skip(page, limit), expected);
    }

    #[rstest]
    #[case::exact(20, 10, 2)]
    #[case::remainder(21, 10, 3)]
    #[case::empty(0, 10, 0)]
    #[case::zero_limit(5, 0, 0)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] limit: u32, #[case] expected: u64) {
        assert_eq!(total_pages(total, limit), expected);
    }

    #[rstest]
    #[case::absent(None, 10)]
    #[case::garbage(Some("abc"), 10)]
    #[case::zero(Some("0"), DEFAULT_LIMIT)]
    #[case::negative(Some("-4"), DEFAULT_LIMIT)]
    #[case::in_range(Some("35"), 35)]
    #[case::above_max(Some("101"), MAX_LIMIT)]
    #[case::huge(Some("99999999999"), MAX_LIMIT)]
    fn parse_limit_applies_fallbacks(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(parse_limit(raw, 10), expected);
    }

    #[rstest]
    #[case::absent(None, 1)]
    #[case::zero(Some("0"), 1)]
    #[case::negative(Some("-2"), 1)]
    #[case::valid(Some("4"), 4)]
    fn parse_page_defaults_to_first_page(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(parse_page(raw), expected);
    }
}
