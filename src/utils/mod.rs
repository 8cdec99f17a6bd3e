// src/utils/mod.rs
pub mod geometry;
pub mod util;

pub use geometry::{BoundingBox, Line2D, Point2D};
