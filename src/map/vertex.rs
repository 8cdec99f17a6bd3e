// src/map/vertex.rs
use crate::map::Face;

/// DOOM line special attached to the edge that starts at a loop vertex.
/// Used when that edge ends up as a one or two-sided wall line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSpecial {
    pub kind: i32,
    pub tag: i32,
    pub flags: i32,
    pub args: [u8; 5],
}

/// A vertex of a brush loop. The edge it describes runs from this vertex to
/// the next one in the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushVertex {
    pub x: f64,
    pub y: f64,

    /// Wall face for the edge starting here; `None` uses the brush default.
    pub w_face: Option<Face>,

    pub line: Option<LineSpecial>,
}

impl BrushVertex {
    pub fn new(x: f64, y: f64) -> Self {
        BrushVertex {
            x,
            y,
            w_face: None,
            line: None,
        }
    }

    pub fn with_face(mut self, face: Face) -> Self {
        self.w_face = Some(face);
        self
    }

    pub fn with_line(mut self, line: LineSpecial) -> Self {
        self.line = Some(line);
        self
    }
}
