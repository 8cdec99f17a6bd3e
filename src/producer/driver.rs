// src/producer/driver.rs

use log::{debug, info};

use crate::config::MinimapConfig;
use crate::csg::{MergeStats, SceneBounds};
use crate::error::CsgResult;
use crate::map::{Medium, PropertySet};
use crate::producer::commands::ProducerCommand;
use crate::scene::Scene;

/// Consumer of finished levels (a WAD/BSP/map writer).
///
/// `end_level` is called before the scene tears the level down, so the
/// exporter can merge and read everything it needs.
pub trait Exporter {
    fn begin_level(&mut self, _scene: &Scene) -> CsgResult<()> {
        Ok(())
    }

    fn property(&mut self, _key: &str, _value: &str) -> CsgResult<()> {
        Ok(())
    }

    fn end_level(&mut self, scene: &mut Scene) -> CsgResult<()>;
}

/// Feeds producer commands into a scene and hands finished levels to an
/// exporter.
pub struct LevelDriver<E: Exporter> {
    scene: Scene,
    exporter: E,
}

impl<E: Exporter> LevelDriver<E> {
    pub fn new(exporter: E) -> Self {
        LevelDriver {
            scene: Scene::new(),
            exporter,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn into_exporter(self) -> E {
        self.exporter
    }

    /// Runs one command. A rejected brush or entity fails this call only.
    pub fn run(&mut self, cmd: &ProducerCommand) -> CsgResult<()> {
        debug!("producer: {}", cmd.name());

        match cmd {
            ProducerCommand::BeginLevel => {
                self.scene.begin_level();
                self.exporter.begin_level(&self.scene)
            }
            ProducerCommand::EndLevel => {
                if !self.scene.is_active() {
                    return Ok(());
                }
                let result = self.exporter.end_level(&mut self.scene);
                self.scene.end_level();
                result
            }
            ProducerCommand::AddBrush(req) => {
                let brush = req.to_brush()?;
                self.scene.add_brush(brush).map(|_| ())
            }
            ProducerCommand::AddEntity(req) => {
                let entity = req.to_entity()?;
                self.scene.add_entity(entity).map(|_| ())
            }
            ProducerCommand::Property(p) => {
                self.scene.set_property(&p.key, &p.value);
                self.exporter.property(&p.key, &p.value)
            }
        }
    }

    /// Runs commands in order, stopping at the first error.
    pub fn run_all(&mut self, cmds: &[ProducerCommand]) -> CsgResult<()> {
        for cmd in cmds {
            self.run(cmd)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub level: u32,
    pub brushes: usize,
    /// brushes that occupy their volume with liquid
    pub liquid_brushes: usize,
    pub entities: usize,
    pub stats: MergeStats,
    pub bounds: SceneBounds,
    pub minimap_lines: usize,
}

/// Exporter that merges each level and records what an exporter would see.
#[derive(Debug, Default)]
pub struct SummaryExporter {
    minimap: Option<MinimapConfig>,
    pub properties: PropertySet,
    pub levels: Vec<LevelSummary>,
}

impl SummaryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also draws (and publishes) a minimap for every level.
    pub fn with_minimap(config: MinimapConfig) -> Self {
        SummaryExporter {
            minimap: Some(config),
            ..Self::default()
        }
    }
}

impl Exporter for SummaryExporter {
    fn property(&mut self, key: &str, value: &str) -> CsgResult<()> {
        self.properties.add(key, value);
        Ok(())
    }

    fn end_level(&mut self, scene: &mut Scene) -> CsgResult<()> {
        let output = scene.merge()?;
        let bounds = scene.scene_bounds()?;

        let minimap_lines = match &self.minimap {
            Some(config) => scene.minimap(config)?.lines.len(),
            None => 0,
        };

        let summary = LevelSummary {
            level: scene.level(),
            brushes: scene.brushes().len(),
            liquid_brushes: scene
                .brushes()
                .iter()
                .filter(|b| b.calc_medium() == Some(Medium::Liquid))
                .count(),
            entities: scene.entities().len(),
            stats: output.stats(),
            bounds,
            minimap_lines,
        };

        info!(
            "Level {}: {} brushes, {} entities, {} regions, size {:.0} x {:.0} x {:.0}",
            summary.level,
            summary.brushes,
            summary.entities,
            summary.stats.regions,
            bounds.width(),
            bounds.depth(),
            bounds.height()
        );

        self.levels.push(summary);
        Ok(())
    }
}
