// src/map/property.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::util::clamp;

/// String-valued key/value bag carried by entities and by the scene itself.
///
/// Values stay strings until an exporter asks for a typed view, the same way
/// the producer hands them over.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    dict: BTreeMap<String, String>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value.
    pub fn add(&mut self, key: &str, value: &str) {
        self.dict.insert(key.to_string(), value.to_string());
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.dict.get(key).map(String::as_str)
    }

    pub fn get_int(&self, key: &str, def_val: i32) -> i32 {
        match self.get_str(key) {
            Some(v) => {
                let v = v.trim();
                v.parse::<i32>()
                    .ok()
                    .or_else(|| v.parse::<f64>().ok().map(|f| f as i32))
                    .unwrap_or(def_val)
            }
            None => def_val,
        }
    }

    /// Parses up to five whitespace or comma separated numbers (Hexen style
    /// special arguments). Missing or unparsable entries are zero.
    pub fn get_hexen_args(&self, key: &str) -> [u8; 5] {
        let mut args = [0u8; 5];
        if let Some(v) = self.get_str(key) {
            let parts = v
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty());
            for (slot, part) in args.iter_mut().zip(parts) {
                *slot = part.parse::<i32>().map(|n| clamp(n, 0, 255) as u8).unwrap_or(0);
            }
        }
        args
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }
}
