//! Share arithmetic for distribution figures.
//!
//! All shares: i64 fixed-point (SCALE = 10_000). No float.
//! An empty denominator yields a zero share.

/// Fixed-point scale factor. A share of 1.0 (100%) is stored as `SCALE`.
pub const SCALE: i64 = 10_000;

/// Fraction `count / total` in fixed point, floored.
/// Returns 0 when `total` is 0.
pub fn share_of(count: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let total = i64::try_from(total).unwrap_or(i64::MAX);
    count.saturating_mul(SCALE) / total
}

/// Render a fixed-point share as a percentage with one decimal place.
/// `4000` (0.4) renders as `"40.0%"`.
pub fn format_percent(share: i64) -> String {
    // tenths of a percent
    let tenths = share / 10;
    format!("{}.{}%", tenths / 10, (tenths % 10).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_of_half() {
        assert_eq!(share_of(1, 2), 5_000);
        assert_eq!(share_of(2, 2), SCALE);
    }

    #[test]
    fn test_share_of_empty_total_is_zero() {
        assert_eq!(share_of(0, 0), 0);
        assert_eq!(share_of(3, 0), 0);
    }

    #[test]
    fn test_share_of_floors() {
        // 1/3 = 0.33333.. -> 3333
        assert_eq!(share_of(1, 3), 3_333);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(4_000), "40.0%");
        assert_eq!(format_percent(3_333), "33.3%");
        assert_eq!(format_percent(SCALE), "100.0%");
        assert_eq!(format_percent(0), "0.0%");
    }
}
