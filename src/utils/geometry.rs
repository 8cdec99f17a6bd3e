// src/utils/geometry.rs
// Planar helpers shared by the brush model, the merge engine and the preview.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Line2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Line2D {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Returns positive if the point is on the right (front) side,
    /// negative if on the left (back) side, near zero if on the line.
    /// The magnitude is the distance scaled by the line length.
    pub fn classify_point(&self, point: &Point2D) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dy * (point.x - self.start.x)) - (dx * (point.y - self.start.y))
    }

    /// Signed perpendicular distance, positive on the left side.
    pub fn left_distance(&self, point: &Point2D) -> f64 {
        let len = self.length();
        if len == 0.0 {
            return -point.distance_to(&self.start);
        }
        -self.classify_point(point) / len
    }

    /// Unit direction vector, or zero for a degenerate line.
    pub fn direction(&self) -> (f64, f64) {
        let len = self.length();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        ((self.end.x - self.start.x) / len, (self.end.y - self.start.y) / len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::new_empty()
    }
}

impl BoundingBox {
    pub fn new_empty() -> Self {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    pub fn expand_point(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// True until at least one point has been added.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    // Check if the bounding box contains a point
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    // Checks if two Bounding Boxes intersects
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.max_x >= other.min_x && self.min_x <= other.max_x &&
        self.max_y >= other.min_y && self.min_y <= other.max_y
    }
}

/// Shoelace area, positive for counter-clockwise loops.
pub fn polygon_signed_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

/// Even-odd ray test. Points exactly on the boundary may go either way.
pub fn point_in_polygon(points: &[Point2D], x: f64, y: f64) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = points[i];
        let pj = points[j];
        if (pi.y > y) != (pj.y > y) {
            let cross_x = pj.x + (y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
