// src/csg/merge.rs
//
// Planar arrangement of all brush loops. Every vertex is snapped to the
// quantization grid, segments are split wherever they cross or touch, and
// the faces of the resulting graph become the merge regions.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};

use crate::csg::{SegmentSide, EPSILON, MAX_SNAP_PASSES, QUANTIZE_GRID};
use crate::map::{Brush, Gap};
use crate::utils::geometry::{point_in_polygon, polygon_signed_area};
use crate::utils::{BoundingBox, Line2D, Point2D};

/// `EPSILON` measured in grid units.
const NEAR_UNITS: f64 = EPSILON / QUANTIZE_GRID;

/// Snapped coordinates are bounded by this many grid units, which keeps
/// every cross product well inside `i128`.
const GRID_LIMIT: f64 = (1u64 << 48) as f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeVertex {
    pub x: f64,
    pub y: f64,
}

impl MergeVertex {
    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// A brush edge that lies along a merge segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeRef {
    pub brush: usize,
    /// Index of the brush vertex the edge starts at.
    pub vertex: usize,
    /// Whether the brush interior is on the front of the segment.
    pub front: bool,
}

impl EdgeRef {
    pub fn side(&self) -> SegmentSide {
        if self.front {
            SegmentSide::Front
        } else {
            SegmentSide::Back
        }
    }
}

/// What lies on one side of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeSide {
    pub region: usize,
    /// Open space at the segment midpoint, `None` when solid.
    pub gap: Option<Gap>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeSegment {
    pub start: usize,
    pub end: usize,
    pub front: Option<MergeSide>,
    pub back: Option<MergeSide>,
    /// Brush edges this segment was cut from.
    pub sources: Vec<EdgeRef>,
}

impl MergeSegment {
    pub fn side(&self, side: SegmentSide) -> Option<&MergeSide> {
        match side {
            SegmentSide::Front => self.front.as_ref(),
            SegmentSide::Back => self.back.as_ref(),
        }
    }

    pub fn gap(&self, side: SegmentSide) -> Option<Gap> {
        self.side(side).and_then(|s| s.gap)
    }

    /// True if either side has open space.
    pub fn has_gap(&self) -> bool {
        self.gap(SegmentSide::Front).is_some() || self.gap(SegmentSide::Back).is_some()
    }

    pub fn is_two_sided(&self) -> bool {
        self.gap(SegmentSide::Front).is_some() && self.gap(SegmentSide::Back).is_some()
    }

    pub fn min_gap_z(&self, side: SegmentSide) -> Option<f64> {
        self.gap(side).map(|g| g.floor)
    }

    pub fn max_gap_z(&self, side: SegmentSide) -> Option<f64> {
        self.gap(side).map(|g| g.ceiling)
    }
}

/// A maximal area covered by one fixed set of brushes.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRegion {
    /// Counter-clockwise outer boundary, as vertex indices.
    pub outline: Vec<usize>,
    /// Clockwise boundaries of uncovered or differently covered islands.
    pub holes: Vec<Vec<usize>>,
    /// Covering brushes, highest priority first.
    pub brushes: Vec<usize>,
    /// The brush deciding floor and ceiling (first non-overlay brush).
    pub gap_brush: Option<usize>,
    /// Area excluding holes.
    pub area: f64,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutput {
    pub vertices: Vec<MergeVertex>,
    pub segments: Vec<MergeSegment>,
    pub regions: Vec<MergeRegion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub vertices: usize,
    pub segments: usize,
    pub regions: usize,
    pub two_sided: usize,
    pub one_sided: usize,
    pub solid: usize,
}

impl MergeOutput {
    pub fn stats(&self) -> MergeStats {
        let mut stats = MergeStats {
            vertices: self.vertices.len(),
            segments: self.segments.len(),
            regions: self.regions.len(),
            ..MergeStats::default()
        };

        for seg in &self.segments {
            if seg.is_two_sided() {
                stats.two_sided += 1;
            } else if seg.has_gap() {
                stats.one_sided += 1;
            } else {
                stats.solid += 1;
            }
        }

        stats
    }
}

/// Point on the quantization grid, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct GridPoint {
    x: i64,
    y: i64,
}

impl GridPoint {
    fn snap(x: f64, y: f64) -> Self {
        Self::from_units(x / QUANTIZE_GRID, y / QUANTIZE_GRID)
    }

    fn from_units(x: f64, y: f64) -> Self {
        GridPoint {
            x: x.round().clamp(-GRID_LIMIT, GRID_LIMIT) as i64,
            y: y.round().clamp(-GRID_LIMIT, GRID_LIMIT) as i64,
        }
    }

    /// Vector from `self` to `to`, widened before subtracting.
    fn delta(self, to: GridPoint) -> (i128, i128) {
        (to.x as i128 - self.x as i128, to.y as i128 - self.y as i128)
    }

    fn units(self) -> Point2D {
        Point2D::new(self.x as f64, self.y as f64)
    }

    fn world(self) -> Point2D {
        Point2D::new(self.x as f64 * QUANTIZE_GRID, self.y as f64 * QUANTIZE_GRID)
    }
}

type SegKey = (GridPoint, GridPoint);
type SegMap = BTreeMap<SegKey, BTreeSet<EdgeRef>>;

/// A brush loop after snapping, with coincident vertices collapsed.
struct SnappedLoop {
    points: Vec<GridPoint>,
    /// Original vertex index for each snapped point.
    vertex: Vec<usize>,
    /// Same loop in grid units.
    outline: Vec<Point2D>,
    bbox: BoundingBox,
}

/// Builds the planar arrangement of the given brushes.
///
/// The result is a pure function of the brush set: the order of `brushes`
/// only changes the indices stored in `brushes`/`sources`, never the
/// geometry or the gaps.
pub fn merge(brushes: &[Brush]) -> MergeOutput {
    let loops = snap_loops(brushes);
    let work = collect_edges(&loops);
    let work = split_segments(work);
    let output = build_output(brushes, &loops, work);

    let stats = output.stats();
    debug!(
        "merge: {} brushes -> {} vertices, {} segments, {} regions",
        brushes.len(),
        stats.vertices,
        stats.segments,
        stats.regions
    );

    output
}

/// Grid point for every brush vertex.
///
/// Rounding alone would keep two points within `EPSILON` apart when they
/// fall on either side of a cell boundary, so each point moves to the
/// smallest neighbouring cell holding a raw point within `EPSILON` of it.
/// Candidates come from the rounded cells only, so welds never chain.
fn weld_points(brushes: &[Brush]) -> Vec<Vec<GridPoint>> {
    let mut occupied: HashMap<GridPoint, Vec<Point2D>> = HashMap::new();
    for v in brushes.iter().flat_map(|b| b.verts.iter()) {
        occupied
            .entry(GridPoint::snap(v.x, v.y))
            .or_default()
            .push(Point2D::new(v.x, v.y));
    }

    brushes
        .iter()
        .map(|brush| {
            brush
                .verts
                .iter()
                .map(|v| {
                    let cell = GridPoint::snap(v.x, v.y);
                    let raw = Point2D::new(v.x, v.y);
                    let mut best = cell;

                    for dx in -1..=1 {
                        for dy in -1..=1 {
                            let other = GridPoint {
                                x: cell.x.saturating_add(dx),
                                y: cell.y.saturating_add(dy),
                            };
                            if other >= best {
                                continue;
                            }
                            let near = occupied
                                .get(&other)
                                .is_some_and(|pts| pts.iter().any(|q| q.distance_to(&raw) < EPSILON));
                            if near {
                                best = other;
                            }
                        }
                    }

                    best
                })
                .collect()
        })
        .collect()
}

fn snap_loops(brushes: &[Brush]) -> Vec<Option<SnappedLoop>> {
    let welded = weld_points(brushes);

    brushes
        .iter()
        .enumerate()
        .map(|(bi, brush)| {
            let mut points: Vec<GridPoint> = Vec::with_capacity(brush.verts.len());
            let mut vertex = Vec::with_capacity(brush.verts.len());

            for (vi, &gp) in welded[bi].iter().enumerate() {
                if points.last() != Some(&gp) {
                    points.push(gp);
                    vertex.push(vi);
                }
            }
            while points.len() > 1 && points.first() == points.last() {
                points.pop();
                vertex.pop();
            }

            let outline: Vec<Point2D> = points.iter().map(|p| p.units()).collect();
            if points.len() < 3 || polygon_signed_area(&outline) <= 0.0 {
                warn!("merge: brush #{} collapses when snapped to the grid, skipped", bi);
                return None;
            }

            let mut bbox = BoundingBox::new_empty();
            for p in &outline {
                bbox.expand_point(p.x, p.y);
            }

            Some(SnappedLoop {
                points,
                vertex,
                outline,
                bbox,
            })
        })
        .collect()
}

/// Orders the endpoints of a segment; the flag is true if `a` stays first.
fn canonical(a: GridPoint, b: GridPoint) -> (SegKey, bool) {
    if a < b {
        ((a, b), true)
    } else {
        ((b, a), false)
    }
}

fn collect_edges(loops: &[Option<SnappedLoop>]) -> SegMap {
    let mut work = SegMap::new();

    for (bi, lp) in loops.iter().enumerate() {
        let Some(lp) = lp else { continue };
        let n = lp.points.len();

        for k in 0..n {
            let (key, same) = canonical(lp.points[k], lp.points[(k + 1) % n]);
            // brush interior lies to the left of its own edge direction
            work.entry(key).or_default().insert(EdgeRef {
                brush: bi,
                vertex: lp.vertex[k],
                front: same,
            });
        }
    }

    work
}

/// Twice the signed area of the triangle (a, b, c).
fn orient(a: GridPoint, b: GridPoint, c: GridPoint) -> i128 {
    let (abx, aby) = a.delta(b);
    let (acx, acy) = a.delta(c);
    abx * acy - aby * acx
}

/// Crossing point of two segments that properly cross each other.
fn crossing(a: GridPoint, b: GridPoint, c: GridPoint, d: GridPoint) -> Option<GridPoint> {
    if a.y.max(b.y) < c.y.min(d.y) || c.y.max(d.y) < a.y.min(b.y) {
        return None;
    }

    let o1 = orient(a, b, c).signum();
    let o2 = orient(a, b, d).signum();
    if o1 * o2 >= 0 {
        return None;
    }

    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    if o3.signum() * o4.signum() >= 0 {
        return None;
    }

    let t = o3 as f64 / (o3 - o4) as f64;
    let (dx, dy) = a.delta(b);
    Some(GridPoint::from_units(
        a.x as f64 + t * dx as f64,
        a.y as f64 + t * dy as f64,
    ))
}

/// True when `p` is within `EPSILON` of the interior of (a, b).
fn near_interior(a: GridPoint, b: GridPoint, p: GridPoint) -> bool {
    let (dx, dy) = a.delta(b);
    let (px, py) = a.delta(p);

    let len2 = dx * dx + dy * dy;
    let along = px * dx + py * dy;
    if along <= 0 || along >= len2 {
        return false;
    }

    let cross = (dx * py - dy * px) as f64;
    cross * cross < NEAR_UNITS * NEAR_UNITS * len2 as f64
}

/// Split points for every segment, indexed like `keys` (which must be sorted).
fn find_splits(keys: &[SegKey]) -> Vec<Vec<GridPoint>> {
    let mut cuts: Vec<Vec<GridPoint>> = vec![Vec::new(); keys.len()];
    let mut points: BTreeSet<GridPoint> = keys.iter().flat_map(|&(a, b)| [a, b]).collect();

    // keys are sorted by their lower x, so the scan can stop early
    for i in 0..keys.len() {
        let (a, b) = keys[i];
        for j in (i + 1)..keys.len() {
            let (c, d) = keys[j];
            if c.x > b.x {
                break;
            }
            if let Some(p) = crossing(a, b, c, d) {
                if p != a && p != b {
                    cuts[i].push(p);
                }
                if p != c && p != d {
                    cuts[j].push(p);
                }
                points.insert(p);
            }
        }
    }

    // endpoints (and new crossings) lying on or next to another segment
    let points: Vec<GridPoint> = points.into_iter().collect();
    for (i, &(a, b)) in keys.iter().enumerate() {
        let lo_y = a.y.min(b.y) - 1;
        let hi_y = a.y.max(b.y) + 1;
        let first = points.partition_point(|p| p.x < a.x - 1);

        for &p in &points[first..] {
            if p.x > b.x + 1 {
                break;
            }
            if p.y < lo_y || p.y > hi_y || p == a || p == b {
                continue;
            }
            if near_interior(a, b, p) {
                cuts[i].push(p);
            }
        }
    }

    cuts
}

/// Pieces of (a, b) after cutting at `cuts`, each oriented from a towards b.
fn cut_segment((a, b): SegKey, cuts: &[GridPoint]) -> Vec<SegKey> {
    let (dx, dy) = a.delta(b);

    let mut along: Vec<(i128, GridPoint)> = cuts
        .iter()
        .map(|&p| {
            let (px, py) = a.delta(p);
            (px * dx + py * dy, p)
        })
        .collect();
    along.sort();
    along.dedup();

    let mut chain = Vec::with_capacity(along.len() + 2);
    chain.push(a);
    chain.extend(along.into_iter().map(|(_, p)| p));
    chain.push(b);

    chain
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| (w[0], w[1]))
        .collect()
}

/// Splits segments until no two of them cross or touch in their interiors.
fn split_segments(mut work: SegMap) -> SegMap {
    for pass in 0..MAX_SNAP_PASSES {
        let keys: Vec<SegKey> = work.keys().copied().collect();
        let cuts = find_splits(&keys);

        if cuts.iter().all(|c| c.is_empty()) {
            debug!("merge: arrangement stable after {} pass(es)", pass + 1);
            return work;
        }

        let mut next = SegMap::new();
        for ((key, sources), cuts) in work.into_iter().zip(cuts.iter()) {
            if cuts.is_empty() {
                next.entry(key).or_default().extend(sources);
                continue;
            }

            for (p, q) in cut_segment(key, cuts) {
                let (piece, same) = canonical(p, q);
                next.entry(piece).or_default().extend(sources.iter().map(|e| EdgeRef {
                    front: e.front == same,
                    ..*e
                }));
            }
        }
        work = next;
    }

    warn!(
        "merge: arrangement still changing after {} passes, using it as is",
        MAX_SNAP_PASSES
    );
    work
}

/// Half-edge view of the segment graph. Half-edge `2*i` runs from the start
/// of segment `i` to its end, `2*i + 1` runs back.
struct HalfEdges {
    origin: Vec<usize>,
    /// Outgoing half-edges of every vertex in counter-clockwise order.
    outgoing: Vec<Vec<usize>>,
    /// Position of each half-edge within its origin's `outgoing` list.
    slot: Vec<usize>,
}

fn half_plane(dx: i128, dy: i128) -> u8 {
    if dy > 0 || (dy == 0 && dx > 0) {
        0
    } else {
        1
    }
}

/// Counter-clockwise order of two directions, starting from +x.
fn direction_cmp(a: (i128, i128), b: (i128, i128)) -> Ordering {
    half_plane(a.0, a.1).cmp(&half_plane(b.0, b.1)).then_with(|| {
        let cross = a.0 * b.1 - a.1 * b.0;
        0.cmp(&cross)
    })
}

impl HalfEdges {
    fn new(points: &[GridPoint], ends: &[(usize, usize)]) -> Self {
        let mut origin = Vec::with_capacity(ends.len() * 2);
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); points.len()];

        for (i, &(s, e)) in ends.iter().enumerate() {
            origin.push(s);
            origin.push(e);
            outgoing[s].push(2 * i);
            outgoing[e].push(2 * i + 1);
        }

        let mut slot = vec![0; origin.len()];
        for list in outgoing.iter_mut() {
            list.sort_by(|&h1, &h2| {
                let dir = |h: usize| {
                    points[origin[h]].delta(points[origin[h ^ 1]])
                };
                direction_cmp(dir(h1), dir(h2)).then(h1.cmp(&h2))
            });
            for (k, &h) in list.iter().enumerate() {
                slot[h] = k;
            }
        }

        HalfEdges {
            origin,
            outgoing,
            slot,
        }
    }

    fn target(&self, h: usize) -> usize {
        self.origin[h ^ 1]
    }

    /// Next half-edge around the face on the left of `h`.
    fn next(&self, h: usize) -> usize {
        let twin = h ^ 1;
        let list = &self.outgoing[self.origin[twin]];
        list[(self.slot[twin] + list.len() - 1) % list.len()]
    }

    /// All face boundaries, plus the cycle index of every half-edge.
    fn cycles(&self) -> (Vec<Vec<usize>>, Vec<usize>) {
        let mut cycle_of = vec![usize::MAX; self.origin.len()];
        let mut cycles = Vec::new();

        for start in 0..self.origin.len() {
            if cycle_of[start] != usize::MAX {
                continue;
            }
            let id = cycles.len();
            let mut cycle = Vec::new();
            let mut h = start;
            while cycle_of[h] == usize::MAX {
                cycle_of[h] = id;
                cycle.push(h);
                h = self.next(h);
            }
            cycles.push(cycle);
        }

        (cycles, cycle_of)
    }
}

/// Whether the brush outline covers the point just left of a boundary
/// travelling in direction `dir` through `m`.
///
/// Works for any simple outline, so region outlines (which need not be
/// convex) can be merged again.
fn covers_left(outline: &[Point2D], m: Point2D, dir: (f64, f64)) -> bool {
    let n = outline.len();
    for i in 0..n {
        let edge = Line2D::new(outline[i], outline[(i + 1) % n]);
        let (ex, ey) = edge.direction();
        let along = ex * dir.0 + ey * dir.1;

        if along.abs() < 0.5 || edge.left_distance(&m).abs() > NEAR_UNITS {
            continue;
        }

        // the boundary runs along this edge: interior is on its left
        let t = (m.x - edge.start.x) * ex + (m.y - edge.start.y) * ey;
        if t > 0.0 && t < edge.length() {
            return along > 0.0;
        }
    }

    point_in_polygon(outline, m.x, m.y)
}

struct Cycle {
    half_edges: Vec<usize>,
    /// Twice the signed area, in grid units.
    area2: i128,
    cover: Vec<usize>,
}

fn build_output(brushes: &[Brush], loops: &[Option<SnappedLoop>], work: SegMap) -> MergeOutput {
    let points: Vec<GridPoint> = work
        .keys()
        .flat_map(|&(a, b)| [a, b])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index: HashMap<GridPoint, usize> = points.iter().enumerate().map(|(i, &p)| (p, i)).collect();

    let mut ends = Vec::with_capacity(work.len());
    let mut sources = Vec::with_capacity(work.len());
    for ((a, b), refs) in work {
        ends.push((index[&a], index[&b]));
        sources.push(refs.into_iter().collect::<Vec<_>>());
    }

    let graph = HalfEdges::new(&points, &ends);
    let (raw_cycles, cycle_of) = graph.cycles();

    let cycles: Vec<Cycle> = raw_cycles
        .into_iter()
        .map(|half_edges| {
            let area2 = half_edges
                .iter()
                .map(|&h| {
                    let a = points[graph.origin[h]];
                    let b = points[graph.target(h)];
                    a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128
                })
                .sum();
            let cover = cycle_cover(brushes, loops, &points, &graph, &half_edges);
            Cycle {
                half_edges,
                area2,
                cover,
            }
        })
        .collect();

    let unit_area = QUANTIZE_GRID * QUANTIZE_GRID * 0.5;
    let vertex_list = |c: &Cycle| -> Vec<usize> { c.half_edges.iter().map(|&h| graph.origin[h]).collect() };

    // bounded faces
    let mut cycle_region: Vec<Option<usize>> = vec![None; cycles.len()];
    let mut regions: Vec<MergeRegion> = Vec::new();
    let mut outlines: Vec<Vec<Point2D>> = Vec::new();

    for (ci, c) in cycles.iter().enumerate() {
        if c.area2 <= 0 || c.cover.is_empty() {
            continue;
        }

        let outline = vertex_list(c);
        let pts: Vec<Point2D> = outline.iter().map(|&v| points[v].world()).collect();
        let mut bbox = BoundingBox::new_empty();
        for p in &pts {
            bbox.expand_point(p.x, p.y);
        }

        cycle_region[ci] = Some(regions.len());
        regions.push(MergeRegion {
            outline,
            holes: Vec::new(),
            brushes: c.cover.clone(),
            gap_brush: c.cover.iter().copied().find(|&b| !brushes[b].is_overlay()),
            area: c.area2 as f64 * unit_area,
            bbox,
        });
        outlines.push(pts);
    }

    // inner boundaries of faces containing other geometry
    for (ci, c) in cycles.iter().enumerate() {
        if c.area2 > 0 || c.cover.is_empty() {
            continue;
        }

        let sample_index = graph.origin[c.half_edges[0]];
        let sample = points[sample_index].world();

        let enclosing = regions
            .iter()
            .enumerate()
            .filter(|(ri, r)| {
                r.bbox.contains_point(sample.x, sample.y)
                    && !r.outline.contains(&sample_index)
                    && point_in_polygon(&outlines[*ri], sample.x, sample.y)
            })
            .min_by(|(ra, _), (rb, _)| {
                polygon_signed_area(&outlines[*ra]).total_cmp(&polygon_signed_area(&outlines[*rb]))
            })
            .map(|(ri, _)| ri);

        match enclosing {
            Some(ri) => {
                if regions[ri].brushes != c.cover {
                    debug!("merge: hole at ({}, {}) disagrees with its region's brushes", sample.x, sample.y);
                }
                regions[ri].area += c.area2 as f64 * unit_area;
                regions[ri].holes.push(vertex_list(c));
                cycle_region[ci] = Some(ri);
            }
            None => warn!("merge: boundary at ({}, {}) has no enclosing region", sample.x, sample.y),
        }
    }

    let vertices: Vec<MergeVertex> = points
        .iter()
        .map(|p| {
            let w = p.world();
            MergeVertex { x: w.x, y: w.y }
        })
        .collect();

    let segments = ends
        .iter()
        .zip(sources)
        .enumerate()
        .map(|(si, (&(start, end), sources))| {
            let mid = vertices[start].point().midpoint(&vertices[end].point());
            let side_for = |h: usize| {
                cycle_region[cycle_of[h]].map(|region| MergeSide {
                    region,
                    gap: regions[region]
                        .gap_brush
                        .and_then(|b| brushes[b].gap_at(mid.x, mid.y)),
                })
            };

            let front = side_for(2 * si);
            let mut back = side_for(2 * si + 1);
            if let (Some(f), Some(b)) = (front, back) {
                if f.region == b.region {
                    warn!("merge: segment {} has region {} on both sides", si, f.region);
                    back = None;
                }
            }

            MergeSegment {
                start,
                end,
                front,
                back,
                sources,
            }
        })
        .collect();

    MergeOutput {
        vertices,
        segments,
        regions,
    }
}

/// Brushes covering the face on the left of a cycle, highest priority first.
/// The face is sampled just beside the middle of its longest edge.
fn cycle_cover(
    brushes: &[Brush],
    loops: &[Option<SnappedLoop>],
    points: &[GridPoint],
    graph: &HalfEdges,
    cycle: &[usize],
) -> Vec<usize> {
    let len2 = |h: usize| {
        let a = points[graph.origin[h]];
        let b = points[graph.target(h)];
        let (dx, dy) = a.delta(b);
        dx * dx + dy * dy
    };

    let Some(&h) = cycle.iter().max_by_key(|&&h| (len2(h), Reverse(h))) else {
        return Vec::new();
    };

    let a = points[graph.origin[h]].units();
    let b = points[graph.target(h)].units();
    let m = a.midpoint(&b);
    let dir = Line2D::new(a, b).direction();

    let mut cover: Vec<usize> = loops
        .iter()
        .enumerate()
        .filter_map(|(bi, lp)| {
            let lp = lp.as_ref()?;
            let sample = BoundingBox::new(
                m.x - NEAR_UNITS,
                m.y - NEAR_UNITS,
                m.x + NEAR_UNITS,
                m.y + NEAR_UNITS,
            );
            (lp.bbox.intersects(&sample) && covers_left(&lp.outline, m, dir)).then_some(bi)
        })
        .collect();

    cover.sort_by(|&x, &y| brushes[x].priority_cmp(&brushes[y]).then(x.cmp(&y)));
    cover
}
