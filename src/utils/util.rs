//! Small numeric helpers shared by the brush model, the validator and the
//! demo generator.

/// Restricts `value` to `[min, max]`. Works for any partially ordered type,
/// so it serves both integer arguments and probabilities.
///
/// ```
/// use rust_csg::utils::util::clamp;
///
/// assert_eq!(clamp(300, 0, 255), 255);
/// assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
/// ```
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Bearing from (sx, sy) towards (ex, ey) in degrees, in the range [0, 360).
///
/// Axis-aligned directions are snapped so that tiny coordinate noise does not
/// produce bearings like 359.9999 for a line pointing along +X.
pub fn calc_angle(sx: f64, sy: f64, ex: f64, ey: f64) -> f64 {
    let dx = ex - sx;
    let dy = ey - sy;

    if dx.abs() < 0.0001 {
        return if dy > 0.0 { 90.0 } else { 270.0 };
    }
    if dy.abs() < 0.0001 {
        return if dx > 0.0 { 0.0 } else { 180.0 };
    }

    let mut angle = dy.atan2(dx).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-4, 0, 255), 0);
    }

    #[test]
    fn test_calc_angle_quadrants() {
        assert_approx_eq!(calc_angle(0.0, 0.0, 1.0, 0.0), 0.0);
        assert_approx_eq!(calc_angle(0.0, 0.0, 0.0, 1.0), 90.0);
        assert_approx_eq!(calc_angle(0.0, 0.0, -1.0, 0.0), 180.0);
        assert_approx_eq!(calc_angle(0.0, 0.0, 0.0, -1.0), 270.0);
        assert_approx_eq!(calc_angle(0.0, 0.0, 1.0, -1.0), 315.0);
    }

    #[test]
    fn test_calc_angle_snaps_axis_noise() {
        assert_approx_eq!(calc_angle(10.0, 10.0, 74.0, 10.00001), 0.0);
        assert_approx_eq!(calc_angle(10.0, 10.0, 9.99999, -54.0), 270.0);
    }
}
