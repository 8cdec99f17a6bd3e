//! # rust_csg
//!
//! Runs a level description (a JSON array of producer commands) through the
//! brush merge and reports what an exporter would receive. Without a level
//! file a random demo level is generated instead.
//!
//! ```text
//! rust_csg [LEVEL.json] [--config CONFIG.json]
//! ```
//!
//! With the `gui` feature the minimap of the last level is shown in a window.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rust_csg::config::CsgConfig;
use rust_csg::producer::{load_commands, LevelDriver, ProceduralGenerator, SummaryExporter};
use rust_csg::CsgResult;

#[derive(Parser, Debug)]
#[command(version, about = "Merge a level of 2.5D brushes and report what an exporter sees")]
struct Args {
    /// Level file: a JSON array of producer commands. Omit to generate a demo level.
    level: Option<PathBuf>,

    /// JSON configuration (minimap and generator settings)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> CsgResult<LevelDriver<SummaryExporter>> {
    let config = match &args.config {
        Some(path) => CsgConfig::from_file(path)?,
        None => CsgConfig::default(),
    };

    let cmds = match &args.level {
        Some(path) => {
            info!("Loading level {}", path.display());
            load_commands(path)?
        }
        None => {
            info!("No level given, generating one (seed {})", config.generator.seed);
            ProceduralGenerator::new(config.generator.clone()).generate()
        }
    };

    let mut driver = LevelDriver::new(SummaryExporter::with_minimap(config.minimap.clone()));
    driver.run_all(&cmds)?;

    Ok(driver)
}

fn main() -> ExitCode {
    env_logger::init();
    info!("rust_csg starting...");

    let args = Args::parse();

    let driver = match run(&args) {
        Ok(driver) => driver,
        Err(e) => {
            if e.is_fatal() {
                error!("Fatal: {}", e);
            } else {
                error!("{}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    for level in &driver.exporter().levels {
        println!(
            "level {}: {} brushes, {} entities -> {} vertices, {} segments, {} regions, {} minimap lines",
            level.level,
            level.brushes,
            level.entities,
            level.stats.vertices,
            level.stats.segments,
            level.stats.regions,
            level.minimap_lines
        );
    }

    #[cfg(feature = "gui")]
    rust_csg::preview::view::run_minimap_window(driver.scene().preview_handle());

    info!("rust_csg exiting.");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_level_and_config() {
        let args = Args::try_parse_from(["rust_csg", "e1m1.json", "-c", "csg.json"]).unwrap();
        assert_eq!(args.level, Some(PathBuf::from("e1m1.json")));
        assert_eq!(args.config, Some(PathBuf::from("csg.json")));

        let args = Args::try_parse_from(["rust_csg", "--config", "csg.json"]).unwrap();
        assert_eq!(args.level, None);
        assert!(args.config.is_some());
    }

    #[test]
    fn test_args_rejects_unknown_options() {
        assert!(Args::try_parse_from(["rust_csg", "--seed", "4"]).is_err());
        assert!(Args::try_parse_from(["rust_csg", "a.json", "b.json"]).is_err());
    }
}
