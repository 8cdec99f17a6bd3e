// src/producer/mod.rs
pub mod commands;
pub mod driver;
pub mod generator;

pub use commands::{load_commands, parse_commands, ProducerCommand};
pub use driver::{Exporter, LevelDriver, LevelSummary, SummaryExporter};
pub use generator::{GenerationStats, ProceduralGenerator};
