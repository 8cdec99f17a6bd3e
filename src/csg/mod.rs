// src/csg/mod.rs
pub mod bounds;
pub mod merge;
pub mod query;
pub mod validate;

pub use bounds::{scene_bounds, SceneBounds};
pub use merge::{merge, EdgeRef, MergeOutput, MergeRegion, MergeSegment, MergeSide, MergeStats, MergeVertex};
pub use validate::{validate, winding_statistic};

/// Grid spacing for quantizing vertices (a power of two, so snapped
/// coordinates are exact in f64).
pub const QUANTIZE_GRID: f64 = 1.0 / 64.0;

/// Distance between two points to consider them equal.
/// The 1.98 provides a small overlap between two quantized vertices.
pub const EPSILON: f64 = QUANTIZE_GRID / 1.98;

/// Room left around the level for exporter-added geometry (outer walls etc).
pub const SCENE_PAD_XY: f64 = 24.0;
pub const SCENE_PAD_Z: f64 = 64.0;

/// Upper limit on split/snap passes before the merge gives up refining.
pub const MAX_SNAP_PASSES: usize = 16;

/// Which side of a merge segment. Segments run from the lower vertex to the
/// higher one (x first, then y); the front is on the left of that direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentSide {
    Front,
    Back,
}
