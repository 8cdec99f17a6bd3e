// src/csg/bounds.rs

use crate::csg::{MergeOutput, SegmentSide, SCENE_PAD_XY, SCENE_PAD_Z};
use crate::error::{CsgError, CsgResult};

/// Box around everything an exporter has to build, padded for outer walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl SceneBounds {
    fn new_empty() -> Self {
        SceneBounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            min_z: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }
}

/// Bounds of every segment that has open space on at least one side.
///
/// Fails with `CompletelySolid` when no such segment exists: the level would
/// have nowhere to stand.
pub fn scene_bounds(output: &MergeOutput) -> CsgResult<SceneBounds> {
    let mut bounds = SceneBounds::new_empty();

    for seg in &output.segments {
        if !seg.has_gap() {
            continue;
        }

        for v in [output.vertices[seg.start], output.vertices[seg.end]] {
            bounds.min_x = bounds.min_x.min(v.x);
            bounds.min_y = bounds.min_y.min(v.y);
            bounds.max_x = bounds.max_x.max(v.x);
            bounds.max_y = bounds.max_y.max(v.y);
        }

        for side in [SegmentSide::Front, SegmentSide::Back] {
            if let Some(gap) = seg.gap(side) {
                bounds.min_z = bounds.min_z.min(gap.floor);
                bounds.max_z = bounds.max_z.max(gap.ceiling);
            }
        }
    }

    if bounds.min_x > bounds.max_x {
        return Err(CsgError::CompletelySolid);
    }

    bounds.min_x -= SCENE_PAD_XY;
    bounds.min_y -= SCENE_PAD_XY;
    bounds.max_x += SCENE_PAD_XY;
    bounds.max_y += SCENE_PAD_XY;
    bounds.min_z -= SCENE_PAD_Z;
    bounds.max_z += SCENE_PAD_Z;

    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::merge;
    use crate::map::Brush;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_bounds_are_padded() {
        let brushes = vec![
            Brush::rect(0.0, 0.0, 128.0, 64.0, 0.0, 128.0),
            Brush::rect(128.0, 0.0, 256.0, 64.0, 32.0, 160.0),
        ];
        let bounds = scene_bounds(&merge(&brushes)).unwrap();

        assert_approx_eq!(bounds.min_x, -24.0);
        assert_approx_eq!(bounds.min_y, -24.0);
        assert_approx_eq!(bounds.max_x, 280.0);
        assert_approx_eq!(bounds.max_y, 88.0);
        assert_approx_eq!(bounds.min_z, -64.0);
        assert_approx_eq!(bounds.max_z, 224.0);
        assert_approx_eq!(bounds.width(), 304.0);
    }

    #[test]
    fn test_solid_segments_are_ignored() {
        let brushes = vec![
            Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 128.0),
            // solid block far away
            Brush::rect(1000.0, 1000.0, 1064.0, 1064.0, 512.0, 512.0),
        ];
        let bounds = scene_bounds(&merge(&brushes)).unwrap();

        assert_approx_eq!(bounds.max_x, 88.0);
        assert_approx_eq!(bounds.max_z, 192.0);
    }

    #[test]
    fn test_single_solid_brush_is_fatal() {
        let brushes = vec![Brush::rect(0.0, 0.0, 64.0, 64.0, 64.0, 0.0)];
        let err = scene_bounds(&merge(&brushes)).unwrap_err();
        assert!(matches!(err, CsgError::CompletelySolid));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_scene_is_fatal() {
        assert!(matches!(
            scene_bounds(&MergeOutput::default()),
            Err(CsgError::CompletelySolid)
        ));
    }
}
