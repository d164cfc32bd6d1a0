#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for Signal Control.
//!
//! Loads a level, replays scripted rotations and clicks through the gameplay
//! system, launches the signal and prints the resulting board. Levels can be
//! shared as single-line transfer strings with `export` and `import`.

mod config;
mod level_transfer;
mod render;
mod session;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use log::info;
use signal_control_core::{CellCoord, CellKind, LevelDescriptor};
use signal_control_system_gameplay::GameStatus;
use signal_control_system_levels::LevelCatalog;

use crate::{
    config::CliConfig,
    render::Board,
    session::{Moves, Session},
};

/// Exit code reported when the signal fails to solve the level.
const EXIT_UNSOLVED: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "signal-control",
    version,
    about = "Route a signal through a grid of rotating cells"
)]
struct Cli {
    /// TOML configuration file; defaults to ./signal-control.toml when present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Lists the levels of the catalog.
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Plays a catalog level with scripted moves.
    Play {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// One-based level number.
        #[arg(long, default_value_t = 1)]
        level: usize,
        #[command(flatten)]
        moves: MoveArgs,
    },
    /// Prints a catalog level as a transfer string.
    Export {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// One-based level number.
        #[arg(long, default_value_t = 1)]
        level: usize,
    },
    /// Plays a level decoded from a transfer string.
    Import {
        /// Transfer string produced by `export`.
        encoded: String,
        #[command(flatten)]
        moves: MoveArgs,
    },
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// JSON level catalog used instead of the built-in levels.
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct MoveArgs {
    /// Flips a blocking cell before the attempt, given as COLUMN,ROW.
    #[arg(long = "toggle", value_name = "COLUMN,ROW", value_parser = parse_cell)]
    toggles: Vec<CellCoord>,
    /// Rotates a cell clockwise, given as COLUMN,ROW.
    #[arg(long = "rotate", value_name = "COLUMN,ROW", value_parser = parse_cell)]
    rotations: Vec<CellCoord>,
    /// Rotates the cell under a world-space point, given as X,Y.
    #[arg(long = "click", value_name = "X,Y", value_parser = parse_point)]
    clicks: Vec<Vec2>,
}

impl From<MoveArgs> for Moves {
    fn from(args: MoveArgs) -> Self {
        Self {
            toggles: args.toggles,
            rotations: args.rotations,
            clicks: args.clicks,
        }
    }
}

/// Entry point for the Signal Control command-line interface.
fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        CliCommand::List { catalog } => {
            let catalog = load_catalog(&catalog, &config)?;
            for (index, level) in catalog.iter().enumerate() {
                println!("{}", summarize(index + 1, level));
                println!("    {}", level.hint);
            }
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Play {
            catalog,
            level,
            moves,
        } => {
            let mut catalog = load_catalog(&catalog, &config)?;
            select_level(&mut catalog, level)?;
            let descriptor = catalog
                .current()
                .context("level catalog has no current level")?;
            play(level, descriptor, &config, moves.into())
        }
        CliCommand::Export { catalog, level } => {
            let mut catalog = load_catalog(&catalog, &config)?;
            select_level(&mut catalog, level)?;
            let descriptor = catalog
                .current()
                .context("level catalog has no current level")?;
            println!("{}", level_transfer::encode(descriptor)?);
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Import { encoded, moves } => {
            let descriptor =
                level_transfer::decode(&encoded).context("failed to import level")?;
            play(1, &descriptor, &config, moves.into())
        }
    }
}

fn load_catalog(args: &CatalogArgs, config: &CliConfig) -> Result<LevelCatalog> {
    match args.levels.as_ref().or(config.levels_file.as_ref()) {
        Some(path) => LevelCatalog::load_from_path(path)
            .with_context(|| format!("failed to load levels from {}", path.display())),
        None => Ok(LevelCatalog::builtin()),
    }
}

fn select_level(catalog: &mut LevelCatalog, number: usize) -> Result<()> {
    if number == 0 || !catalog.set_current(number - 1) {
        bail!(
            "level {number} does not exist, the catalog has {} level(s)",
            catalog.len()
        );
    }
    Ok(())
}

fn play(
    number: usize,
    level: &LevelDescriptor,
    config: &CliConfig,
    moves: Moves,
) -> Result<ExitCode> {
    println!("{}", summarize(number, level));
    if let Some(tutorial) = &level.tutorial {
        println!("Tutorial: {tutorial}");
    }

    let mut session = Session::new(level, config)?;
    let report = session.play(&moves)?;
    info!("level {number} settled as {:?}", report.status);

    print!("{}", Board(&session.view()));
    println!("{}", render::describe(report.outcome));
    println!(
        "{} of {} action(s) left",
        report.remaining_actions, level.action_limit
    );

    if report.status == GameStatus::Won {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Hint: {}", level.hint);
        Ok(ExitCode::from(EXIT_UNSOLVED))
    }
}

fn summarize(number: usize, level: &LevelDescriptor) -> String {
    let checkpoints = level
        .cells
        .iter()
        .filter(|placement| placement.kind == CellKind::Checkpoint)
        .count();
    format!(
        "Level {number}: {}x{} grid, {} action(s), {checkpoints} checkpoint(s)",
        level.columns, level.rows, level.action_limit
    )
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = split_pair(value)?;
    let column = column
        .parse::<u32>()
        .map_err(|error| format!("invalid column '{column}': {error}"))?;
    let row = row
        .parse::<u32>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    Ok(CellCoord::new(column, row))
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = split_pair(value)?;
    let x = x
        .parse::<f32>()
        .map_err(|error| format!("invalid x '{x}': {error}"))?;
    let y = y
        .parse::<f32>()
        .map_err(|error| format!("invalid y '{y}': {error}"))?;
    Ok(Vec2::new(x, y))
}

fn split_pair(value: &str) -> Result<(&str, &str), String> {
    value
        .split_once(',')
        .map(|(first, second)| (first.trim(), second.trim()))
        .ok_or_else(|| format!("expected two comma-separated values, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_parse_from_comma_pairs() {
        assert_eq!(parse_cell("3, 1"), Ok(CellCoord::new(3, 1)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("-1,2").is_err());
    }

    #[test]
    fn points_parse_as_floats() {
        assert_eq!(parse_point("10.5,-4"), Ok(Vec2::new(10.5, -4.0)));
        assert!(parse_point("x,4").is_err());
    }

    #[test]
    fn level_numbers_are_one_based() {
        let mut catalog = LevelCatalog::builtin();
        assert!(select_level(&mut catalog, 0).is_err());
        assert!(select_level(&mut catalog, 4).is_err());
        select_level(&mut catalog, 3).expect("third level exists");
        assert_eq!(catalog.current_index(), 2);
    }

    #[test]
    fn command_line_parses_repeated_moves() {
        let cli = Cli::try_parse_from([
            "signal-control",
            "play",
            "--level",
            "2",
            "--rotate",
            "1,1",
            "--rotate",
            "2,1",
            "--click",
            "35,35",
        ])
        .expect("arguments parse");

        match cli.command {
            CliCommand::Play { level, moves, .. } => {
                assert_eq!(level, 2);
                assert_eq!(moves.rotations.len(), 2);
                assert_eq!(moves.clicks, vec![Vec2::new(35.0, 35.0)]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
