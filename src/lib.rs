// src/lib.rs

pub mod config;
pub mod csg;
pub mod error;
pub mod map;
pub mod preview;
pub mod producer;
pub mod scene;
pub mod utils;

pub use config::CsgConfig;
pub use error::{CsgError, CsgResult, ValidationError};
pub use scene::Scene;
