// src/preview/mod.rs
pub mod minimap;
#[cfg(feature = "gui")]
pub mod view;

pub use minimap::{classify, LineColor, Minimap, MinimapLine, ENTITY_RGB};
