// src/map/entity.rs
use crate::map::PropertySet;

/// A point object: monster, item, player start, trigger anchor...
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity type name, e.g. `"player1"` or `"shotgun"`.
    pub name: String,

    pub x: f64,
    pub y: f64,
    pub z: f64,

    pub props: PropertySet,

    /// Engine specific numeric arguments (Hexen style), if any.
    pub args: Option<[u8; 5]>,
}

impl Entity {
    pub fn new(name: &str, x: f64, y: f64, z: f64) -> Self {
        Entity {
            name: name.to_string(),
            x,
            y,
            z,
            props: PropertySet::new(),
            args: None,
        }
    }

    /// Facing angle in degrees, taken from the `angle` property.
    pub fn angle(&self) -> i32 {
        self.props.get_int("angle", 0)
    }
}
