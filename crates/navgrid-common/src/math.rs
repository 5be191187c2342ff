//! Scalar and component-wise math helpers

use glam::Vec3;

/// Linear interpolation between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise minimum of two vectors
#[inline]
pub fn vmin(a: &Vec3, b: &Vec3) -> Vec3 {
    a.min(*b)
}

/// Component-wise maximum of two vectors
#[inline]
pub fn vmax(a: &Vec3, b: &Vec3) -> Vec3 {
    a.max(*b)
}

/// Truncates a floating point size to a non-negative integer count.
///
/// Negative and NaN inputs map to zero, fractional parts are dropped.
#[inline]
pub fn truncate_size(size: f32) -> usize {
    // `as` saturates: NaN and negatives become 0
    size.trunc() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_vmin_vmax() {
        let a = Vec3::new(1.0, 5.0, -2.0);
        let b = Vec3::new(3.0, 0.0, -4.0);
        assert_eq!(vmin(&a, &b), Vec3::new(1.0, 0.0, -4.0));
        assert_eq!(vmax(&a, &b), Vec3::new(3.0, 5.0, -2.0));
    }

    #[test]
    fn test_truncate_size() {
        assert_eq!(truncate_size(100.9), 100);
        assert_eq!(truncate_size(1.0), 1);
        assert_eq!(truncate_size(0.5), 0);
        assert_eq!(truncate_size(-3.0), 0);
        assert_eq!(truncate_size(f32::NAN), 0);
    }
}
