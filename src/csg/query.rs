// src/csg/query.rs
// Lookups on a finished merge.

use crate::csg::merge::{EdgeRef, MergeOutput, MergeRegion};
use crate::csg::SegmentSide;
use crate::map::{Brush, Gap};
use crate::utils::geometry::point_in_polygon;
use crate::utils::Point2D;

impl MergeOutput {
    fn loop_points(&self, indices: &[usize]) -> Vec<Point2D> {
        indices.iter().map(|&v| self.vertices[v].point()).collect()
    }

    pub fn region_outline(&self, region: &MergeRegion) -> Vec<Point2D> {
        self.loop_points(&region.outline)
    }

    /// True if (x, y) lies inside the region's outline and outside its holes.
    pub fn region_contains(&self, region: &MergeRegion, x: f64, y: f64) -> bool {
        region.bbox.contains_point(x, y)
            && point_in_polygon(&self.region_outline(region), x, y)
            && !region
                .holes
                .iter()
                .any(|hole| point_in_polygon(&self.loop_points(hole), x, y))
    }

    /// Region containing the point, or `None` outside every brush.
    /// Points on a boundary may report either neighbour.
    pub fn find_region_for_point(&self, x: f64, y: f64) -> Option<usize> {
        self.regions
            .iter()
            .position(|region| self.region_contains(region, x, y))
    }

    /// Floor and ceiling at (x, y) as decided by the covering brushes.
    pub fn gap_at(&self, brushes: &[Brush], x: f64, y: f64) -> Option<Gap> {
        let region = &self.regions[self.find_region_for_point(x, y)?];
        brushes.get(region.gap_brush?)?.gap_at(x, y)
    }

    /// Brush deciding the gap on one side of a segment.
    pub fn find_side_brush(&self, segment: usize, side: SegmentSide) -> Option<usize> {
        let side = self.segments.get(segment)?.side(side)?;
        self.regions[side.region].gap_brush
    }

    /// Edge of the deciding brush that lies along the segment, facing the
    /// requested side. `None` when that brush has no edge here (the segment
    /// was cut from a brush it overrides).
    pub fn find_side_vertex(&self, segment: usize, side: SegmentSide) -> Option<EdgeRef> {
        let brush = self.find_side_brush(segment, side)?;
        self.segments[segment]
            .sources
            .iter()
            .find(|e| e.brush == brush && e.side() == side)
            .copied()
    }

    /// Re-expresses a hole-free region as a brush copying the properties and
    /// planes of its deciding brush (or its first brush if all are overlays).
    pub fn region_as_brush(&self, brushes: &[Brush], region: usize) -> Option<Brush> {
        let region = self.regions.get(region)?;
        if !region.holes.is_empty() {
            return None;
        }

        let source = &brushes[region.gap_brush.or_else(|| region.brushes.first().copied())?];

        let mut brush = source.copy_without_geometry();
        brush.bottom.slope = source.bottom.slope.clone();
        brush.top.slope = source.top.slope.clone();

        for &v in &region.outline {
            let p = self.vertices[v];
            brush.add_vertex(p.x, p.y);
        }
        brush.compute_bbox();

        Some(brush)
    }
}
