//! Assertion utilities for testing.
//!
//! This module provides helper functions for making assertions in tests,
//! particularly for floating-point map values.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f32, expected: f32, epsilon: Option<f32>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that every pixel of a map holds `expected`
pub fn assert_constant_map(map: &[f32], expected: f32, epsilon: Option<f32>) {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);

    for (pix, value) in map.iter().enumerate() {
        assert!(
            (value - expected).abs() <= eps,
            "Pixel {} differs: actual = {}, expected = {}, epsilon = {}",
            pix,
            value,
            expected,
            eps
        );
    }
}

/// Assert that two maps are identical, bit for bit, NaN included
pub fn assert_maps_identical(actual: &[f32], expected: &[f32]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Maps have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    for (pix, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "Maps differ at pixel {}: actual = {}, expected = {}",
            pix,
            a,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0000001, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_maps_identical() {
        assert_maps_identical(&[1.0, f32::NAN], &[1.0, f32::NAN]);
    }
}
