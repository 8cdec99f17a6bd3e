// src/preview/minimap.rs

use log::debug;

use crate::config::MinimapConfig;
use crate::csg::{scene_bounds, MergeOutput, MergeSegment, SegmentSide};
use crate::error::CsgResult;
use crate::map::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineColor {
    /// one-sided, open space on one side only
    Wall,
    /// not enough head room to pass
    Blocked,
    Step,
    Neutral,
}

impl LineColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            LineColor::Wall => [255, 255, 255],
            LineColor::Blocked => [255, 0, 0],
            LineColor::Step => [0, 255, 192],
            LineColor::Neutral => [160, 160, 160],
        }
    }
}

pub const ENTITY_RGB: [u8; 3] = [255, 255, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapLine {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub color: LineColor,
}

/// Small overview picture of a merged level, in pixel coordinates
/// (y grows upwards like map space).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Minimap {
    pub width: i32,
    pub height: i32,
    pub lines: Vec<MinimapLine>,
    pub entities: Vec<(i32, i32)>,
}

impl Minimap {
    /// Fails like `scene_bounds` when the level has no open space.
    pub fn build(output: &MergeOutput, entities: &[Entity], config: &MinimapConfig) -> CsgResult<Minimap> {
        let bounds = scene_bounds(output)?;
        let (cent_x, cent_y) = bounds.center();
        let scale = config.scale.max(1);

        let to_pixel = |x: f64, y: f64| {
            (
                (x - cent_x).ceil() as i32 / scale + config.width / 2,
                (y - cent_y).ceil() as i32 / scale + config.height / 2,
            )
        };

        let mut map = Minimap {
            width: config.width,
            height: config.height,
            lines: Vec::new(),
            entities: Vec::new(),
        };

        for seg in &output.segments {
            let Some(color) = classify(seg, config) else { continue };

            let start = output.vertices[seg.start];
            let end = output.vertices[seg.end];
            let (x1, y1) = to_pixel(start.x, start.y);
            let (x2, y2) = to_pixel(end.x, end.y);

            map.lines.push(MinimapLine { x1, y1, x2, y2, color });
        }

        for ent in entities {
            map.entities.push(to_pixel(ent.x, ent.y));
        }

        debug!(
            "minimap: {} lines, {} entities, {}x{} px",
            map.lines.len(),
            map.entities.len(),
            map.width,
            map.height
        );

        Ok(map)
    }

    pub fn count(&self, color: LineColor) -> usize {
        self.lines.iter().filter(|l| l.color == color).count()
    }
}

/// Colour for a segment, or `None` when it should not be drawn.
pub fn classify(seg: &MergeSegment, config: &MinimapConfig) -> Option<LineColor> {
    if !seg.has_gap() {
        return None;
    }

    let (Some(front), Some(back)) = (seg.gap(SegmentSide::Front), seg.gap(SegmentSide::Back)) else {
        return Some(LineColor::Wall);
    };

    let (f1, f2) = (front.floor, back.floor);
    let (c1, c2) = (front.ceiling, back.ceiling);

    if (f1 - f2).abs() < config.same_tolerance && (c1 - c2).abs() < config.same_tolerance {
        return None;
    }

    if c1.min(c2) < f1.max(f2) + config.min_clearance {
        Some(LineColor::Blocked)
    } else if (f1 - f2).abs() > config.step_height {
        Some(LineColor::Step)
    } else {
        Some(LineColor::Neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::{merge, MergeSide};
    use crate::map::{Brush, Gap};

    fn segment(front: Option<(f64, f64)>, back: Option<(f64, f64)>) -> MergeSegment {
        let side = |g: Option<(f64, f64)>| {
            Some(MergeSide {
                region: 0,
                gap: g.map(|(floor, ceiling)| Gap { floor, ceiling }),
            })
        };
        MergeSegment {
            start: 0,
            end: 1,
            front: side(front),
            back: side(back),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_classify() {
        let config = MinimapConfig::default();

        assert_eq!(classify(&segment(None, None), &config), None);
        assert_eq!(classify(&segment(Some((0.0, 128.0)), None), &config), Some(LineColor::Wall));
        assert_eq!(
            classify(&segment(Some((0.0, 128.0)), Some((0.05, 128.0))), &config),
            None
        );
        assert_eq!(
            classify(&segment(Some((0.0, 128.0)), Some((80.0, 128.0))), &config),
            Some(LineColor::Blocked)
        );
        assert_eq!(
            classify(&segment(Some((0.0, 128.0)), Some((32.0, 160.0))), &config),
            Some(LineColor::Step)
        );
        assert_eq!(
            classify(&segment(Some((0.0, 128.0)), Some((16.0, 128.0))), &config),
            Some(LineColor::Neutral)
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(LineColor::Blocked.rgb(), [255, 0, 0]);
        assert_eq!(LineColor::Step.rgb(), [0, 255, 192]);
        assert_eq!(LineColor::Neutral.rgb(), [160, 160, 160]);
        assert_eq!(LineColor::Wall.rgb(), [255, 255, 255]);
    }

    #[test]
    fn test_build_maps_to_pixels() {
        let brushes = vec![Brush::rect(0.0, 0.0, 128.0, 128.0, 0.0, 128.0)];
        let out = merge(&brushes);
        let player = Entity::new("player1", 64.0, 64.0, 0.0);

        let map = Minimap::build(&out, &[player], &MinimapConfig::default()).unwrap();

        assert_eq!(map.lines.len(), 4);
        assert_eq!(map.count(LineColor::Wall), 4);
        assert_eq!(map.entities, vec![(25, 25)]);

        let xs: Vec<i32> = map.lines.iter().flat_map(|l| [l.x1, l.x2]).collect();
        assert_eq!(xs.iter().min(), Some(&24));
        assert_eq!(xs.iter().max(), Some(&26));
    }

    #[test]
    fn test_hidden_seams_are_not_drawn() {
        let brushes = vec![
            Brush::rect(0.0, 0.0, 128.0, 128.0, 0.0, 128.0),
            Brush::rect(128.0, 0.0, 256.0, 128.0, 0.0, 128.0),
            Brush::rect(256.0, 0.0, 384.0, 128.0, 32.0, 128.0),
        ];
        let out = merge(&brushes);
        let map = Minimap::build(&out, &[], &MinimapConfig::default()).unwrap();

        assert_eq!(map.count(LineColor::Step), 1);
        assert_eq!(map.count(LineColor::Wall), 8);
        assert_eq!(map.lines.len(), 9);
    }

    #[test]
    fn test_solid_level_has_no_minimap() {
        let brushes = vec![Brush::rect(0.0, 0.0, 128.0, 128.0, 0.0, 0.0)];
        assert!(Minimap::build(&merge(&brushes), &[], &MinimapConfig::default()).is_err());
    }
}
