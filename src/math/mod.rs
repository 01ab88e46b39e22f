//! Math utilities and types for 3D graphics and game logic.
//!
//! This module provides matrix and vector types and operations, as well as
//! helper functions for angle conversions and curve evaluation. All types are
//! designed to be compatible with GPU memory layouts (e.g., for use with WGPU/WGSL).
//!
//! # Module Organization
//!
//! - [`vec`] module contains all vector operations
//! - [`mat`] module contains all matrix operations
//! - Utility functions like angle conversions are provided at root level

pub mod mat;
pub mod vec;

/// Converts degrees to radians.
///
/// This handles angle wrapping by first normalizing the input to the range (-360, 360).
///
/// # Arguments
///
/// * `degrees` - The angle in degrees (can be any finite value)
///
/// # Example
/// ```rust,ignore
/// use crate::math::deg_to_rad;
///
/// assert_eq!(deg_to_rad(180.0), std::f32::consts::PI);
/// assert_eq!(deg_to_rad(540.0), std::f32::consts::PI);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (std::f32::consts::PI / 180.0)
}

/// Evaluates a cubic Bezier curve at `t` in any dimension.
///
/// `t = 0` gives the first control point and `t = 1` the last. Values outside
/// `[0, 1]` extrapolate.
///
/// # Arguments
///
/// * `points` - The four control points
/// * `t` - Curve parameter
pub fn cubic_bezier<const N: usize>(points: &[[f32; N]; 4], t: f32) -> [f32; N] {
    let u = 1.0 - t;
    let weights = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];

    let mut out = [0.0; N];
    for (axis, value) in out.iter_mut().enumerate() {
        *value = points
            .iter()
            .zip(weights)
            .map(|(point, weight)| point[axis] * weight)
            .sum();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVE: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 2.0], [3.0, 2.0], [4.0, 0.0]];

    #[test]
    fn test_bezier_endpoints() {
        assert_eq!(cubic_bezier(&CURVE, 0.0), [0.0, 0.0]);
        assert_eq!(cubic_bezier(&CURVE, 1.0), [4.0, 0.0]);
    }

    /// A symmetric curve peaks at its midpoint.
    #[test]
    fn test_bezier_midpoint() {
        let [x, y] = cubic_bezier(&CURVE, 0.5);
        assert!((x - 2.0).abs() < 1e-6);
        assert!((y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_deg_to_rad_wraps() {
        assert!((deg_to_rad(450.0) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
