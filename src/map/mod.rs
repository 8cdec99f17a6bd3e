// src/map/mod.rs
pub mod brush;
pub mod entity;
pub mod face;
pub mod property;
pub mod slope;
pub mod vertex;

pub use brush::{Brush, BrushFlags, BrushKind, BrushPlane, Gap, Medium};
pub use entity::Entity;
pub use face::Face;
pub use property::PropertySet;
pub use slope::SlopePlane;
pub use vertex::{BrushVertex, LineSpecial};
