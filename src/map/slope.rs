// src/map/slope.rs
/// Tilt of a floor or ceiling.
///
/// Gives two points on the 2D map and the change in Z between them. The
/// absolute Z is not stored here: heights are always relative to an external
/// base (the bounding height of the brush plane that owns the slope).
#[derive(Debug, Clone, PartialEq)]
pub struct SlopePlane {
    pub sx: f64,
    pub sy: f64,
    pub ex: f64,
    pub ey: f64,
    pub dz: f64,
}

impl SlopePlane {
    pub fn new(sx: f64, sy: f64, ex: f64, ey: f64, dz: f64) -> Self {
        SlopePlane { sx, sy, ex, ey, dz }
    }

    /// A slope whose reference points coincide has no direction.
    pub fn is_degenerate(&self) -> bool {
        let dx = self.ex - self.sx;
        let dy = self.ey - self.sy;
        dx * dx + dy * dy < 1e-12
    }

    /// Swaps the reference points, keeping the same plane when the base
    /// height is moved to the old end point.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.sx, &mut self.ex);
        std::mem::swap(&mut self.sy, &mut self.ey);
        self.dz = -self.dz;
    }

    /// Height at (x, y) for a plane passing through `base_z` at the start point.
    pub fn calc_z(&self, base_z: f64, x: f64, y: f64) -> f64 {
        if self.is_degenerate() {
            return base_z;
        }
        let dx = self.ex - self.sx;
        let dy = self.ey - self.sy;
        let len_squared = dx * dx + dy * dy;
        let along = (x - self.sx) * dx + (y - self.sy) * dy;
        base_z + self.dz * along / len_squared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_calc_z_along_and_across() {
        let slope = SlopePlane::new(0.0, 0.0, 128.0, 0.0, 32.0);
        assert_approx_eq!(slope.calc_z(16.0, 0.0, 0.0), 16.0);
        assert_approx_eq!(slope.calc_z(16.0, 64.0, 0.0), 32.0);
        assert_approx_eq!(slope.calc_z(16.0, 128.0, 500.0), 48.0);
        // beyond the end point the plane keeps going
        assert_approx_eq!(slope.calc_z(16.0, 256.0, 0.0), 80.0);
    }

    #[test]
    fn test_reverse_keeps_plane() {
        let mut slope = SlopePlane::new(0.0, 0.0, 0.0, 100.0, 50.0);
        let at_mid = slope.calc_z(0.0, 10.0, 40.0);
        slope.reverse();
        // base moves to the old end point, which was 50 units higher
        assert_approx_eq!(slope.calc_z(50.0, 10.0, 40.0), at_mid);
    }

    #[test]
    fn test_degenerate_slope_is_flat() {
        let slope = SlopePlane::new(5.0, 5.0, 5.0, 5.0, 8.0);
        assert!(slope.is_degenerate());
        assert_approx_eq!(slope.calc_z(24.0, 100.0, -7.0), 24.0);
    }
}
