// src/csg/validate.rs

use crate::csg::EPSILON;
use crate::error::ValidationError;
use crate::map::{Brush, BrushVertex};
use crate::utils::util::calc_angle;

/// Checks a brush loop before it may enter the scene.
///
/// In order, stopping at the first failure: at least 3 vertices, finite
/// coordinates, no edge shorter than `EPSILON`, and counter-clockwise
/// winding. Never mutates the brush.
pub fn validate(brush: &Brush) -> Result<(), ValidationError> {
    let verts = &brush.verts;

    if verts.len() < 3 {
        return Err(ValidationError::TooFewVertices);
    }

    if verts.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
        return Err(ValidationError::NonFiniteVertex);
    }

    for (k, v1) in verts.iter().enumerate() {
        let v2 = &verts[(k + 1) % verts.len()];
        if (v2.x - v1.x).hypot(v2.y - v1.y) < EPSILON {
            return Err(ValidationError::ZeroLengthLine);
        }
    }

    if winding_statistic(verts) > 180.0 {
        return Err(ValidationError::WrongWinding);
    }

    Ok(())
}

/// Average turn angle of a loop, in degrees.
///
/// At every vertex the angle is swept from the bearing of the next vertex
/// round to the bearing of the previous one. For a simple counter-clockwise
/// loop this is the interior angle and the average is `180 - 360/n`;
/// reversing the loop gives `180 + 360/n`.
pub fn winding_statistic(verts: &[BrushVertex]) -> f64 {
    let n = verts.len();
    if n == 0 {
        return 0.0;
    }

    let mut total = 0.0;

    for k in 0..n {
        let v1 = &verts[k];
        let v2 = &verts[(k + 1) % n];
        let v3 = &verts[(k + 2) % n];

        let ang_prev = calc_angle(v2.x, v2.y, v1.x, v1.y);
        let ang_next = calc_angle(v2.x, v2.y, v3.x, v3.y);

        let mut diff = ang_prev - ang_next;
        if diff < 0.0 {
            diff += 360.0;
        }

        total += diff;
    }

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::TAU;

    /// Convex counter-clockwise loop on a jittered ellipse.
    fn random_convex_loop(rng: &mut StdRng) -> Brush {
        let n = rng.random_range(3..=12);
        let rx = rng.random_range(16.0..512.0);
        let ry = rng.random_range(16.0..512.0);
        let cx = rng.random_range(-1024.0..1024.0);
        let cy = rng.random_range(-1024.0..1024.0);

        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let jitter: f64 = rng.random_range(0.0..0.5);
                let a = TAU * (i as f64 + jitter) / n as f64;
                (cx + rx * a.cos(), cy + ry * a.sin())
            })
            .collect();

        Brush::from_points(&points, 0.0, 128.0)
    }

    #[test]
    fn test_valid_convex_loops_pass() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let brush = random_convex_loop(&mut rng);
            assert_eq!(validate(&brush), Ok(()), "loop {:?}", brush.verts);
        }
    }

    #[test]
    fn test_reversed_loops_fail_winding() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut brush = random_convex_loop(&mut rng);
            let n = brush.verts.len() as f64;
            assert_approx_eq!(winding_statistic(&brush.verts), 180.0 - 360.0 / n, 1e-6);

            brush.verts.reverse();
            assert_approx_eq!(winding_statistic(&brush.verts), 180.0 + 360.0 / n, 1e-6);
            assert_eq!(validate(&brush), Err(ValidationError::WrongWinding));
        }
    }

    #[test]
    fn test_single_short_edge_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut brush = random_convex_loop(&mut rng);
            let k = rng.random_range(0..brush.verts.len());
            let a = brush.verts[k].clone();
            let b = brush.verts[(k + 1) % brush.verts.len()].clone();

            // a point just past `a` along the edge towards `b`
            let len = (b.x - a.x).hypot(b.y - a.y);
            let step = EPSILON * 0.5 / len;
            let near = BrushVertex::new(a.x + (b.x - a.x) * step, a.y + (b.y - a.y) * step);
            brush.verts.insert(k + 1, near);

            assert_eq!(validate(&brush), Err(ValidationError::ZeroLengthLine));
        }
    }

    #[test]
    fn test_non_finite_vertex_is_rejected() {
        let mut brush = Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 64.0);
        brush.verts[2].x = f64::NAN;
        assert_eq!(validate(&brush), Err(ValidationError::NonFiniteVertex));

        brush.verts[2].x = 64.0;
        brush.verts[0].y = f64::NEG_INFINITY;
        assert_eq!(validate(&brush), Err(ValidationError::NonFiniteVertex));
    }

    #[test]
    fn test_too_few_vertices() {
        let brush = Brush::from_points(&[(0.0, 0.0), (64.0, 0.0)], 0.0, 64.0);
        assert_eq!(validate(&brush), Err(ValidationError::TooFewVertices));
        assert_eq!(validate(&Brush::new()), Err(ValidationError::TooFewVertices));
    }

    #[test]
    fn test_collinear_vertices_allowed() {
        let brush = Brush::from_points(
            &[(0.0, 0.0), (32.0, 0.0), (64.0, 0.0), (64.0, 64.0), (0.0, 64.0)],
            0.0,
            64.0,
        );
        assert_eq!(validate(&brush), Ok(()));
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let brush = Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 64.0);
        let before = brush.clone();
        let _ = brush.validate();
        assert_eq!(brush, before);
    }
}
