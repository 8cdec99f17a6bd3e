// src/scene/scene.rs

use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::config::MinimapConfig;
use crate::csg::{merge, scene_bounds, MergeOutput, SceneBounds};
use crate::error::{CsgError, CsgResult};
use crate::map::{Brush, BrushFlags, Entity, PropertySet};
use crate::preview::Minimap;

/// What a preview reader sees: always a completed merge, never one in
/// progress.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Number of the level the snapshot belongs to (1 for the first).
    pub level: u32,
    pub output: Option<Arc<MergeOutput>>,
    pub minimap: Option<Arc<Minimap>>,
    /// Set once the level has ended; the minimap is then the final one.
    pub finished: bool,
}

impl Snapshot {
    /// One-line description for status bars.
    pub fn status(&self) -> String {
        match &self.output {
            Some(output) => {
                let stats = output.stats();
                format!(
                    "level {}: {} vertices, {} segments, {} regions",
                    self.level, stats.vertices, stats.segments, stats.regions
                )
            }
            None if self.level == 0 => "waiting for a level".to_string(),
            None if self.finished => format!("level {}: finished", self.level),
            None => format!("level {}: building...", self.level),
        }
    }
}

/// Cloneable, thread-safe reader of the scene's published results.
#[derive(Debug, Clone, Default)]
pub struct PreviewHandle {
    shared: Arc<RwLock<Snapshot>>,
}

impl PreviewHandle {
    pub fn snapshot(&self) -> Snapshot {
        self.shared.read().clone()
    }

    pub fn output(&self) -> Option<Arc<MergeOutput>> {
        self.shared.read().output.clone()
    }

    pub fn minimap(&self) -> Option<Arc<Minimap>> {
        self.shared.read().minimap.clone()
    }

    fn publish(&self, update: impl FnOnce(&mut Snapshot)) {
        let mut snapshot = self.shared.write();
        update(&mut snapshot);
    }
}

/// Brushes, entities and merge results of the level being built.
///
/// Owned by the caller and passed to exporters explicitly. Properties are
/// game-wide and survive `end_level`.
#[derive(Debug, Default)]
pub struct Scene {
    brushes: Vec<Brush>,
    entities: Vec<Entity>,
    properties: PropertySet,
    merged: Option<Arc<MergeOutput>>,
    active: bool,
    level: u32,
    preview: PreviewHandle,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_level(&mut self) {
        if self.active {
            warn!("begin_level: level {} was never ended", self.level);
            self.end_level();
        }

        self.level += 1;
        self.active = true;

        let level = self.level;
        self.preview.publish(|snap| {
            snap.level = level;
            snap.output = None;
            snap.finished = false;
        });

        info!("Begin level {}", self.level);
    }

    /// Releases brushes, entities and the merge output. Safe to call twice.
    pub fn end_level(&mut self) {
        if !self.active {
            return;
        }

        self.brushes.clear();
        self.entities.clear();
        self.merged = None;
        self.active = false;

        // keep the minimap around for the preview window
        self.preview.publish(|snap| {
            snap.output = None;
            snap.finished = true;
        });

        info!("End level {}", self.level);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    fn require_active(&self) -> CsgResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(CsgError::NoActiveLevel)
        }
    }

    /// Validates the brush and stores it. Returns the brush index.
    pub fn add_brush(&mut self, mut brush: Brush) -> CsgResult<usize> {
        self.require_active()?;
        brush.validate()?;

        brush.compute_bbox();
        brush.update_quad_flag();
        brush.flags.remove(BrushFlags::SEEN);

        debug!(
            "add_brush #{}: {} with {} vertices",
            self.brushes.len(),
            brush.kind.name(),
            brush.verts.len()
        );
        self.brushes.push(brush);
        if self.merged.take().is_some() {
            self.preview.publish(|snap| snap.output = None);
        }
        Ok(self.brushes.len() - 1)
    }

    pub fn add_entity(&mut self, entity: Entity) -> CsgResult<usize> {
        self.require_active()?;
        self.entities.push(entity);
        Ok(self.entities.len() - 1)
    }

    pub fn set_property(&mut self, key: &str, value: &str) {
        debug!("property {} = {}", key, value);
        self.properties.add(key, value);
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get_str(key)
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Merges the current brushes and publishes the result.
    pub fn merge(&mut self) -> CsgResult<Arc<MergeOutput>> {
        self.require_active()?;

        let output = Arc::new(merge(&self.brushes));

        for brush in self.brushes.iter_mut() {
            brush.flags.remove(BrushFlags::SEEN);
        }
        for region in &output.regions {
            if let Some(b) = region.gap_brush {
                self.brushes[b].flags.insert(BrushFlags::SEEN);
            }
        }

        let stats = output.stats();
        info!(
            "Merged {} brushes: {} vertices, {} segments ({} two-sided), {} regions",
            self.brushes.len(),
            stats.vertices,
            stats.segments,
            stats.two_sided,
            stats.regions
        );

        let published = Arc::clone(&output);
        self.preview.publish(|snap| snap.output = Some(published));
        self.merged = Some(Arc::clone(&output));

        Ok(output)
    }

    /// The last merge, if it is still current.
    pub fn merged(&self) -> Option<Arc<MergeOutput>> {
        self.merged.clone()
    }

    fn require_merged(&self) -> CsgResult<&MergeOutput> {
        self.merged.as_deref().ok_or(CsgError::NotMerged)
    }

    pub fn scene_bounds(&self) -> CsgResult<SceneBounds> {
        scene_bounds(self.require_merged()?)
    }

    /// Draws the minimap of the last merge and publishes it.
    pub fn minimap(&self, config: &MinimapConfig) -> CsgResult<Arc<Minimap>> {
        let map = Arc::new(Minimap::build(self.require_merged()?, &self.entities, config)?);

        let published = Arc::clone(&map);
        self.preview.publish(|snap| snap.minimap = Some(published));

        Ok(map)
    }

    pub fn preview_handle(&self) -> PreviewHandle {
        self.preview.clone()
    }
}
