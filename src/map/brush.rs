// src/map/brush.rs

use std::cmp::Ordering;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::map::{BrushVertex, Face, SlopePlane};
use crate::utils::BoundingBox;

/// Classification of a brush, set by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushKind {
    #[default]
    Solid,
    /// ignored for clipping (Quake 1/2 only)
    Detail,
    /// clipping only, no visible faces (Quake 1/2 only)
    Clip,
    Sky,
    Liquid,
    /// supplies a railing (DOOM/Nukem only)
    Rail,
    /// supplies extra lighting or shadow
    Light,
    Trigger,
}

impl BrushKind {
    pub fn name(&self) -> &'static str {
        match self {
            BrushKind::Solid => "solid",
            BrushKind::Detail => "detail",
            BrushKind::Clip => "clip",
            BrushKind::Sky => "sky",
            BrushKind::Liquid => "liquid",
            BrushKind::Rail => "rail",
            BrushKind::Light => "light",
            BrushKind::Trigger => "trigger",
        }
    }

    /// Overlay brushes split the arrangement and are recorded on the regions
    /// they cover, but never decide a region's floor and ceiling.
    pub fn is_overlay(&self) -> bool {
        matches!(self, BrushKind::Rail | BrushKind::Light | BrushKind::Trigger)
    }

    /// Lower wins when two brushes cover the same cell with equal marks.
    fn precedence(&self) -> u8 {
        match self {
            BrushKind::Solid => 0,
            BrushKind::Sky => 1,
            BrushKind::Liquid => 2,
            BrushKind::Detail => 3,
            BrushKind::Clip => 4,
            BrushKind::Rail => 5,
            BrushKind::Light => 6,
            BrushKind::Trigger => 7,
        }
    }
}

/// Coarse occupancy used for collision and visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Solid,
    Empty,
    Liquid,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BrushFlags: u32 {
        const DETAIL = 1 << 0;
        const NO_CLIP = 1 << 1;
        const NO_DRAW = 1 << 2;
        const NO_SHADOW = 1 << 3;

        // internal flags
        /// brush is a four-sided axis-aligned box
        const QUAD = 1 << 16;
        /// brush decides the gap of at least one merged region
        const SEEN = 1 << 17;
    }
}

/// Open vertical interval between a floor and a ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub floor: f64,
    pub ceiling: f64,
}

impl Gap {
    pub fn height(&self) -> f64 {
        self.ceiling - self.floor
    }
}

/// Bottom or top of a brush.
///
/// Without a slope `z` is simply the height. With a slope it is still a
/// bounding height of the brush (lowest point of a floor, highest point of a
/// ceiling) and the slope is measured from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrushPlane {
    pub z: f64,
    pub slope: Option<SlopePlane>,
    pub face: Face,
}

impl BrushPlane {
    pub fn flat(z: f64) -> Self {
        BrushPlane {
            z,
            slope: None,
            face: Face::default(),
        }
    }

    /// Builds a sloped floor from two 3D points. The slope always rises from
    /// its start point so that `z` is the lowest height along it.
    pub fn sloped_floor(sx: f64, sy: f64, sz: f64, ex: f64, ey: f64, ez: f64) -> Self {
        let mut slope = SlopePlane::new(sx, sy, ex, ey, ez - sz);
        if sz > ez {
            slope.reverse();
        }
        BrushPlane {
            z: sz.min(ez),
            slope: Some(slope),
            face: Face::default(),
        }
    }

    /// Builds a sloped ceiling from two 3D points. The slope always falls from
    /// its start point so that `z` is the highest height along it.
    pub fn sloped_ceiling(sx: f64, sy: f64, sz: f64, ex: f64, ey: f64, ez: f64) -> Self {
        let mut slope = SlopePlane::new(sx, sy, ex, ey, ez - sz);
        if sz < ez {
            slope.reverse();
        }
        BrushPlane {
            z: sz.max(ez),
            slope: Some(slope),
            face: Face::default(),
        }
    }

    pub fn with_face(mut self, face: Face) -> Self {
        self.face = face;
        self
    }

    /// Height of this plane at (x, y).
    pub fn z_at(&self, x: f64, y: f64) -> f64 {
        match &self.slope {
            Some(slope) => slope.calc_z(self.z, x, y),
            None => self.z,
        }
    }
}

/// A convex, height-extruded polygon. Co-linear sides are allowed.
///
/// The loop must be counter-clockwise (interior on the left of every edge).
/// The space between `bottom` and `top` is open; a brush whose top is at or
/// below its bottom is completely solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub kind: BrushKind,
    pub flags: BrushFlags,

    pub verts: Vec<BrushVertex>,

    pub bottom: BrushPlane,
    pub top: BrushPlane,

    /// Default wall face for edges whose vertex has none.
    pub w_face: Option<Face>,

    /// Separating number, lowest wins where brushes overlap.
    pub mark: i32,
    pub sec_kind: i32,
    pub sec_tag: i32,

    /// Cached bounds, refreshed by `compute_bbox`.
    pub bbox: BoundingBox,
}

impl Default for Brush {
    fn default() -> Self {
        Brush::new()
    }
}

impl Brush {
    pub fn new() -> Self {
        Brush {
            kind: BrushKind::Solid,
            flags: BrushFlags::empty(),
            verts: Vec::new(),
            bottom: BrushPlane::flat(0.0),
            top: BrushPlane::flat(0.0),
            w_face: None,
            mark: 0,
            sec_kind: 0,
            sec_tag: 0,
            bbox: BoundingBox::new_empty(),
        }
    }

    /// Axis-aligned box from (x1, y1) to (x2, y2), wound counter-clockwise.
    pub fn rect(x1: f64, y1: f64, x2: f64, y2: f64, z1: f64, z2: f64) -> Self {
        let mut brush = Brush::new();
        brush.add_vertex(x1, y1);
        brush.add_vertex(x2, y1);
        brush.add_vertex(x2, y2);
        brush.add_vertex(x1, y2);
        brush.bottom = BrushPlane::flat(z1);
        brush.top = BrushPlane::flat(z2);
        brush.compute_bbox();
        brush
    }

    /// Brush from a list of (x, y) pairs with flat bottom and top.
    pub fn from_points(points: &[(f64, f64)], z1: f64, z2: f64) -> Self {
        let mut brush = Brush::new();
        for &(x, y) in points {
            brush.add_vertex(x, y);
        }
        brush.bottom = BrushPlane::flat(z1);
        brush.top = BrushPlane::flat(z2);
        brush.compute_bbox();
        brush
    }

    pub fn add_vertex(&mut self, x: f64, y: f64) -> &mut BrushVertex {
        self.verts.push(BrushVertex::new(x, y));
        let last = self.verts.len() - 1;
        &mut self.verts[last]
    }

    pub fn push_vertex(&mut self, vertex: BrushVertex) {
        self.verts.push(vertex);
    }

    /// Copies the scalar fields and plane heights/faces, but not the vertex
    /// loop and not the slopes: the copy has no geometric identity of its own
    /// until new vertices are added.
    pub fn copy_without_geometry(&self) -> Brush {
        Brush {
            kind: self.kind,
            flags: self.flags,
            verts: Vec::new(),
            bottom: BrushPlane {
                z: self.bottom.z,
                slope: None,
                face: self.bottom.face.clone(),
            },
            top: BrushPlane {
                z: self.top.z,
                slope: None,
                face: self.top.face.clone(),
            },
            w_face: self.w_face.clone(),
            mark: self.mark,
            sec_kind: self.sec_kind,
            sec_tag: self.sec_tag,
            bbox: BoundingBox::new_empty(),
        }
    }

    pub fn compute_bbox(&mut self) {
        let mut bbox = BoundingBox::new_empty();
        for v in &self.verts {
            bbox.expand_point(v.x, v.y);
        }
        self.bbox = bbox;
    }

    /// Makes sure there are enough vertices, no zero length edges and the
    /// required winding.
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::csg::validate::validate(self)
    }

    pub fn is_overlay(&self) -> bool {
        self.kind.is_overlay()
    }

    /// True when the unsloped heights leave room between bottom and top.
    pub fn has_open_space(&self) -> bool {
        self.top.z > self.bottom.z
    }

    /// Floor and ceiling at (x, y), or `None` if there is no room there.
    pub fn gap_at(&self, x: f64, y: f64) -> Option<Gap> {
        let floor = self.bottom.z_at(x, y);
        let ceiling = self.top.z_at(x, y);
        if ceiling > floor {
            Some(Gap { floor, ceiling })
        } else {
            None
        }
    }

    /// Medium this brush contributes, or `None` when it takes no part in
    /// collision/visibility (triggers, lights, no-clip and no-draw brushes).
    pub fn calc_medium(&self) -> Option<Medium> {
        if matches!(self.kind, BrushKind::Trigger | BrushKind::Light)
            || self.flags.contains(BrushFlags::NO_CLIP)
            || self.flags.contains(BrushFlags::NO_DRAW)
        {
            return None;
        }

        match self.kind {
            BrushKind::Sky => Some(Medium::Solid),
            BrushKind::Liquid => Some(Medium::Liquid),
            _ if self.has_open_space() => Some(Medium::Empty),
            _ => Some(Medium::Solid),
        }
    }

    /// Wall face for the edge starting at `vertex`.
    pub fn wall_face(&self, vertex: usize) -> Option<&Face> {
        self.verts
            .get(vertex)
            .and_then(|v| v.w_face.as_ref())
            .or(self.w_face.as_ref())
    }

    pub fn update_quad_flag(&mut self) {
        let n = self.verts.len();
        let is_quad = n == 4
            && (0..n).all(|i| {
                let a = &self.verts[i];
                let b = &self.verts[(i + 1) % n];
                (a.x - b.x).abs() < 1e-9 || (a.y - b.y).abs() < 1e-9
            });
        self.flags.set(BrushFlags::QUAD, is_quad);
    }

    /// Total order deciding which brush owns a cell covered by several.
    ///
    /// Only brush content takes part, so the winner never depends on the
    /// order in which the producer added the brushes.
    pub fn priority_cmp(&self, other: &Brush) -> Ordering {
        self.mark
            .cmp(&other.mark)
            .then_with(|| self.kind.precedence().cmp(&other.kind.precedence()))
            .then_with(|| self.bottom.z.total_cmp(&other.bottom.z))
            .then_with(|| self.top.z.total_cmp(&other.top.z))
            .then_with(|| self.flags.bits().cmp(&other.flags.bits()))
            .then_with(|| self.sec_kind.cmp(&other.sec_kind))
            .then_with(|| self.sec_tag.cmp(&other.sec_tag))
            .then_with(|| cmp_slopes(&self.bottom.slope, &other.bottom.slope))
            .then_with(|| cmp_slopes(&self.top.slope, &other.top.slope))
            .then_with(|| self.bottom.face.texture.cmp(&other.bottom.face.texture))
            .then_with(|| self.top.face.texture.cmp(&other.top.face.texture))
            .then_with(|| self.verts.len().cmp(&other.verts.len()))
            .then_with(|| {
                self.verts
                    .iter()
                    .zip(other.verts.iter())
                    .map(|(a, b)| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)))
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

fn cmp_slopes(a: &Option<SlopePlane>, b: &Option<SlopePlane>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .sx
            .total_cmp(&b.sx)
            .then_with(|| a.sy.total_cmp(&b.sy))
            .then_with(|| a.ex.total_cmp(&b.ex))
            .then_with(|| a.ey.total_cmp(&b.ey))
            .then_with(|| a.dz.total_cmp(&b.dz)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_compute_bbox_triangle() {
        let brush = Brush::from_points(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 0.0, 128.0);
        assert_eq!(brush.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_compute_bbox_is_repeatable() {
        let mut brush = Brush::rect(-32.0, 16.0, 64.0, 80.0, 0.0, 128.0);
        let first = brush.bbox;
        brush.compute_bbox();
        brush.compute_bbox();
        assert_eq!(brush.bbox, first);
        assert_eq!(first, BoundingBox::new(-32.0, 16.0, 64.0, 80.0));
    }

    #[test]
    fn test_copy_without_geometry_is_shallow() {
        let mut brush = Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 128.0);
        brush.bottom = BrushPlane::sloped_floor(0.0, 0.0, 0.0, 64.0, 0.0, 32.0);
        brush.mark = 3;
        brush.kind = BrushKind::Liquid;
        brush.top.face = Face::new("CEIL3_5");

        let copy = brush.copy_without_geometry();
        assert!(copy.verts.is_empty());
        assert!(copy.bottom.slope.is_none());
        assert_eq!(copy.bottom.z, brush.bottom.z);
        assert_eq!(copy.top.face.texture, "CEIL3_5");
        assert_eq!(copy.mark, 3);
        assert_eq!(copy.kind, BrushKind::Liquid);
    }

    #[test]
    fn test_sloped_planes_keep_bounding_heights() {
        let floor = BrushPlane::sloped_floor(0.0, 0.0, 48.0, 128.0, 0.0, 16.0);
        assert_approx_eq!(floor.z, 16.0);
        assert_approx_eq!(floor.z_at(0.0, 0.0), 48.0);
        assert_approx_eq!(floor.z_at(128.0, 0.0), 16.0);
        assert_approx_eq!(floor.z_at(64.0, 0.0), 32.0);

        let ceil = BrushPlane::sloped_ceiling(0.0, 0.0, 128.0, 0.0, 64.0, 192.0);
        assert_approx_eq!(ceil.z, 192.0);
        assert_approx_eq!(ceil.z_at(0.0, 32.0), 160.0);
    }

    #[test]
    fn test_gap_at() {
        let brush = Brush::rect(0.0, 0.0, 64.0, 64.0, 8.0, 72.0);
        let gap = brush.gap_at(32.0, 32.0).unwrap();
        assert_approx_eq!(gap.floor, 8.0);
        assert_approx_eq!(gap.height(), 64.0);

        let solid = Brush::rect(0.0, 0.0, 64.0, 64.0, 72.0, 72.0);
        assert!(solid.gap_at(32.0, 32.0).is_none());
    }

    #[test]
    fn test_calc_medium() {
        let mut brush = Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 128.0);
        assert_eq!(brush.calc_medium(), Some(Medium::Empty));

        brush.kind = BrushKind::Sky;
        assert_eq!(brush.calc_medium(), Some(Medium::Solid));

        brush.kind = BrushKind::Liquid;
        assert_eq!(brush.calc_medium(), Some(Medium::Liquid));

        brush.kind = BrushKind::Trigger;
        assert_eq!(brush.calc_medium(), None);

        brush.kind = BrushKind::Solid;
        brush.flags.insert(BrushFlags::NO_DRAW);
        assert_eq!(brush.calc_medium(), None);

        let solid = Brush::rect(0.0, 0.0, 64.0, 64.0, 64.0, 0.0);
        assert_eq!(solid.calc_medium(), Some(Medium::Solid));
    }

    #[test]
    fn test_quad_flag() {
        let mut brush = Brush::rect(0.0, 0.0, 64.0, 32.0, 0.0, 128.0);
        brush.update_quad_flag();
        assert!(brush.flags.contains(BrushFlags::QUAD));

        let mut tri = Brush::from_points(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 0.0, 8.0);
        tri.flags.insert(BrushFlags::QUAD);
        tri.update_quad_flag();
        assert!(!tri.flags.contains(BrushFlags::QUAD));
    }

    #[test]
    fn test_flags_combine_and_clear() {
        let mut flags = BrushFlags::DETAIL | BrushFlags::NO_SHADOW;
        assert!(flags.contains(BrushFlags::NO_SHADOW));
        assert_eq!(flags.bits(), 0b1001);

        flags.set(BrushFlags::SEEN, true);
        flags.remove(BrushFlags::DETAIL);
        assert_eq!(flags, BrushFlags::NO_SHADOW | BrushFlags::SEEN);
        assert_eq!(Brush::new().flags, BrushFlags::empty());
    }

    #[test]
    fn test_priority_prefers_low_mark_then_kind() {
        let mut a = Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 128.0);
        let mut b = a.clone();
        b.mark = 1;
        assert_eq!(a.priority_cmp(&b), Ordering::Less);

        b.mark = 0;
        b.kind = BrushKind::Light;
        assert_eq!(a.priority_cmp(&b), Ordering::Less);

        a.kind = BrushKind::Light;
        assert_eq!(a.priority_cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_wall_face_falls_back_to_brush_default() {
        let mut brush = Brush::rect(0.0, 0.0, 64.0, 64.0, 0.0, 128.0);
        brush.w_face = Some(Face::new("STARTAN3"));
        brush.verts[1].w_face = Some(Face::new("DOOR3"));

        assert_eq!(brush.wall_face(0).map(|f| f.texture.as_str()), Some("STARTAN3"));
        assert_eq!(brush.wall_face(1).map(|f| f.texture.as_str()), Some("DOOR3"));
    }
}
