// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Solves "Rush Hour" board files and prints the moves.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`, e.g.
//! `RUST_LOG=parking_solver=debug solve board.txt`.

use clap::{Parser, ValueEnum};
use parking_solver::config::ConfigError;
use parking_solver::record::read_board;
use parking_solver::{Board, Move, SolveError, Solution, Solver, SolverConfig};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board files, one `<h|v> <row> <column> <length> <id>` record per line
    #[arg(required = true)]
    boards: Vec<PathBuf>,

    /// TOML solver configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up on a board after expanding this many positions
    #[arg(short, long)]
    max_expansions: Option<usize>,

    /// How to print solutions
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Check that every step of a solution is a legal move before printing it
    #[arg(long)]
    verify: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    file: &'a Path,
    moves: Vec<Move>,
    path: &'a [Board],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

// the command line cap wins over the configured one
fn load_config(args: &Args) -> Result<SolverConfig, ConfigError> {
    let config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    Ok(match args.max_expansions {
        Some(limit) => config.with_max_expansions(limit),
        None => config,
    })
}

fn run(args: &Args) -> Result<bool, Box<dyn Error>> {
    let solver = Solver::new(load_config(args)?);

    let mut all_solved = true;
    for file in &args.boards {
        match solve_file(&solver, file, args) {
            Ok(solved) => all_solved &= solved,
            Err(e) => {
                error!(file = %file.display(), "{e}");
                all_solved = false;
            }
        }
    }
    Ok(all_solved)
}

fn solve_file(solver: &Solver, file: &Path, args: &Args) -> Result<bool, Box<dyn Error>> {
    let board: Board = read_board(file)?;
    info!(file = %file.display(), vehicles = board.vehicles().count(), "loaded board");

    let solution = match solver.solve(&board) {
        Ok(solution) => solution,
        Err(SolveError::Unsolvable { expanded }) => {
            println!(
                "{}: no solution ({expanded} positions explored)",
                file.display()
            );
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    if args.verify {
        verify(solution.path())?;
    }

    match args.format {
        Format::Text => print_text(file, &solution),
        Format::Json => println!("{}", json_report(file, &solution)?),
    }
    Ok(true)
}

fn verify(path: &[Board]) -> Result<(), Box<dyn Error>> {
    for (step, pair) in path.windows(2).enumerate() {
        if !pair[0].is_neighbor(&pair[1]) {
            return Err(format!("step {} of the solution is not a legal move", step + 1).into());
        }
    }
    Ok(())
}

fn json_report(file: &Path, solution: &Solution) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report {
        file,
        moves: solution.moves(),
        path: solution.path(),
    })
}

fn print_text(file: &Path, solution: &Solution) {
    println!("{}", file.display());
    println!("{}", solution.initial());
    for (i, step) in solution.moves().iter().enumerate() {
        println!("  move {}: {step}", i + 1);
    }
    println!();
    println!("{}", solution.goal());
    println!(
        "solved in {} moves ({} positions explored)",
        solution.steps(),
        solution.expanded()
    );
}
