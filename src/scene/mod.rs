// src/scene/mod.rs
mod scene;

pub use self::scene::{PreviewHandle, Scene, Snapshot};
