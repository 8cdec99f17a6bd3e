// src/config.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CsgResult;

/// Tunables for a run. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsgConfig {
    pub minimap: MinimapConfig,
    pub generator: GeneratorConfig,
}

impl CsgConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CsgResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> CsgResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinimapConfig {
    /// Size of the preview in pixels.
    pub width: i32,
    pub height: i32,
    /// Map units per pixel.
    pub scale: i32,
    /// Gaps closer than this on both floor and ceiling are not drawn.
    pub same_tolerance: f64,
    /// Two-sided lines with less head room than this are drawn as blocked.
    pub min_clearance: f64,
    /// Floor differences above this are drawn as steps.
    pub step_height: f64,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        MinimapConfig {
            width: 50,
            height: 50,
            scale: 64,
            same_tolerance: 0.1,
            min_clearance: 52.5,
            step_height: 24.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Extent of the generated area in map units.
    pub width: i32,
    pub height: i32,
    /// All room corners land on multiples of this.
    pub grid: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub room_count: usize,
    pub corridor_width: i32,
    /// Chance of an extra corridor between two rooms already connected.
    pub branching_factor: f64,
    pub monsters_per_room: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 1,
            width: 2048,
            height: 2048,
            grid: 64,
            min_room_size: 192,
            max_room_size: 512,
            room_count: 8,
            corridor_width: 64,
            branching_factor: 0.2,
            monsters_per_room: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsgError;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = CsgConfig::from_json(r#"{ "minimap": { "scale": 32 } }"#).unwrap();
        assert_eq!(config.minimap.scale, 32);
        assert_eq!(config.minimap.width, 50);
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = CsgConfig::from_json(r#"{ "minimap": { "zoom": 2 } }"#).unwrap_err();
        assert!(matches!(err, CsgError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CsgConfig::from_file("/nonexistent/rust_csg.json").unwrap_err();
        assert!(matches!(err, CsgError::Io(_)));
    }
}
