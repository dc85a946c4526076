//! Precision constants for geometric comparisons.
//!
//! Zero checks on magnitudes are exact (`== 0.0`); these tolerances are only
//! used by the explicitly tolerant queries and by tests.

/// Confusion tolerance for checking coincidence of two points in real space.
/// Two points are coincident if their distance < CONFUSION.
/// Value: 1.0e-7
pub const CONFUSION: f64 = 1.0e-7;

/// Returns true if `a` and `b` differ by at most `tolerance`.
#[inline]
pub fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Rounds to a fixed number of decimal places, ties to even.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
