// src/map/face.rs
use serde::{Deserialize, Serialize};

/// Texture reference for a wall, floor or ceiling.
///
/// Offsets are optional: `None` lets the exporter pick its own alignment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Face {
    /// Texture (or flat) name, e.g. `"STARTAN3"` or `"FLOOR4_8"`.
    pub texture: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_offset: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<f64>,

    /// Lower/upper unpegged (DOOM only).
    #[serde(default)]
    pub peg: bool,
}

impl Face {
    pub fn new(texture: &str) -> Self {
        Face {
            texture: texture.to_string(),
            ..Face::default()
        }
    }
}
