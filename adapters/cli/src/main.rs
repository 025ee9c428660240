#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a complete hunt: generate a grid, find a
//! route, replay it step by step, and record the outcome.
//!
//! Everything the kernel excludes lives here: argument parsing, board
//! rendering, scorekeeping, statistics persistence, and map transfer. The
//! kernel only ever sees grids, paths, and RNG state.

mod map_transfer;
mod render;
mod stats;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wumpus_hunt_core::{
    CellCoord, CellKind, DifficultyProfile, Path, ReplayError, ReplayStatus, StepResult,
    WELCOME_BANNER,
};
use wumpus_hunt_system_generation::{apply_challenge_update, derive_level_seed, generate};
use wumpus_hunt_system_pathfinding::{astar, bfs};
use wumpus_hunt_system_replay::Replay;
use wumpus_hunt_world::{Grid, TeleportMap};

use crate::stats::{GameRecord, JsonStatsStore, StatsStore};

/// Points awarded for collecting the gold before step deductions.
const WIN_BONUS: i64 = 1000;

/// Points deducted per step when the gold is collected.
const STEP_COST: i64 = 10;

/// Command-line arguments for a single hunt.
#[derive(Debug, Parser)]
#[command(name = "wumpus-hunt", about = "Self-playing wumpus hunt on a generated grid")]
struct Args {
    /// Side length of the square grid.
    #[arg(long, default_value_t = 10)]
    size: u32,

    /// Difficulty preset controlling hazard counts.
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Override the preset's wumpus count.
    #[arg(long, value_name = "N")]
    wumpuses: Option<u32>,

    /// Override the preset's pit count.
    #[arg(long, value_name = "N")]
    pits: Option<u32>,

    /// Override the preset's obstacle count.
    #[arg(long, value_name = "N")]
    obstacles: Option<u32>,

    /// Override the preset's trap count.
    #[arg(long, value_name = "N")]
    traps: Option<u32>,

    /// Override the preset's teleport cell count.
    #[arg(long, value_name = "N")]
    teleports: Option<u32>,

    /// Seed for reproducible runs; omitted runs draw entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Level index mixed into the seed so campaigns get distinct grids.
    #[arg(long, default_value_t = 0)]
    level: u32,

    /// Agent start position as `row,col`.
    #[arg(long, value_parser = parse_cell, default_value = "0,0")]
    agent: CellCoord,

    /// Goal position as `row,col`; defaults to the far corner.
    #[arg(long, value_parser = parse_cell)]
    goal: Option<CellCoord>,

    /// Search used to plan the route.
    #[arg(long, value_enum, default_value_t = Solver::Astar)]
    solver: Solver,

    /// Render the board after every step.
    #[arg(long)]
    trace: bool,

    /// Mutate the grid every N steps and recompute the route.
    #[arg(long, value_name = "STEPS")]
    challenge: Option<u32>,

    /// Record the outcome into this JSON statistics file.
    #[arg(long, value_name = "FILE")]
    stats: Option<PathBuf>,

    /// Print the generated board as a transferable map string and exit.
    #[arg(long)]
    export_map: bool,

    /// Run on a previously exported map string instead of generating.
    #[arg(long, value_name = "MAP")]
    import_map: Option<String>,
}

/// Difficulty presets exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Difficulty {
    /// One wumpus and a handful of pits.
    Easy,
    /// The default mix of hazards.
    Medium,
    /// Dense hazards plus a teleport.
    Hard,
    /// Everything the generator can throw at the agent.
    Expert,
}

impl Difficulty {
    fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile::EASY,
            Self::Medium => DifficultyProfile::MEDIUM,
            Self::Hard => DifficultyProfile::HARD,
            Self::Expert => DifficultyProfile::EXPERT,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }
}

/// Route searches exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Solver {
    /// Unweighted shortest path; ignores teleport transport.
    Bfs,
    /// Cost-aware search with teleport transport and surcharge.
    Astar,
}

/// Entry point for the Wumpus Hunt command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    println!("{WELCOME_BANNER}");

    let session = setup(&args)?;
    if args.export_map {
        println!("{}", map_transfer::encode(&session.grid, &session.teleports));
        return Ok(());
    }

    run(args, session)
}

struct Session {
    grid: Grid,
    teleports: TeleportMap,
    agent: CellCoord,
    goal: CellCoord,
    rng: ChaCha8Rng,
}

fn setup(args: &Args) -> Result<Session> {
    let global_seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let level_seed = derive_level_seed(global_seed, args.level);
    let mut rng = ChaCha8Rng::seed_from_u64(level_seed);

    if let Some(encoded) = &args.import_map {
        let (grid, teleports) = map_transfer::decode(encoded).context("importing map")?;
        let Some(agent) = grid.find(CellKind::Agent) else {
            bail!("imported map places no agent");
        };
        let Some(goal) = grid.find(CellKind::Goal) else {
            bail!("imported map places no gold");
        };
        return Ok(Session {
            grid,
            teleports,
            agent,
            goal,
            rng,
        });
    }

    if args.size < 2 {
        bail!("grid size must be at least 2, got {}", args.size);
    }
    let agent = args.agent;
    let goal = args
        .goal
        .unwrap_or_else(|| CellCoord::new(args.size - 1, args.size - 1));
    if agent == goal {
        bail!("agent and gold cannot share a cell");
    }

    println!(
        "seed {global_seed}, level {}, difficulty {}",
        args.level,
        args.difficulty.label()
    );
    let (grid, teleports) = generate(args.size, &resolved_profile(args), agent, goal, &mut rng)
        .context("generating grid")?;
    Ok(Session {
        grid,
        teleports,
        agent,
        goal,
        rng,
    })
}

fn run(args: Args, session: Session) -> Result<()> {
    let Session {
        mut grid,
        teleports,
        agent,
        goal,
        mut rng,
    } = session;

    println!("{}", render::LEGEND);
    print!("{}", render::render_grid(&grid));

    let path = solve(args.solver, &grid, &teleports, agent, goal);
    if path.is_empty() {
        println!("No route to the gold exists.");
        return Ok(());
    }
    println!("route found: {} steps planned", path.len());

    let mut replay = Replay::new(agent, path);
    let mut score: i64 = 0;
    let mut traps_sprung: u32 = 0;
    let mut steps_since_challenge: u32 = 0;

    loop {
        if replay.status().is_terminal() {
            break;
        }

        let result = match replay.step(&mut grid, &teleports) {
            Ok(result) => result,
            // The route ran dry without reaching the gold, typically after
            // a challenge update cut it off.
            Err(ReplayError::InvalidState(_)) => break,
            Err(error) => return Err(error.into()),
        };

        println!("step {}: {}", replay.steps_taken(), render::describe(result));
        if let StepResult::Trapped(penalty) = result {
            score -= i64::from(penalty);
            traps_sprung += 1;
        }
        if args.trace {
            print!("{}", render::render_grid(&grid));
        }

        if let Some(interval) = args.challenge {
            steps_since_challenge += 1;
            if interval > 0 && steps_since_challenge >= interval && !replay.status().is_terminal()
            {
                steps_since_challenge = 0;
                if let Some(change) = apply_challenge_update(&mut grid, replay.agent(), &mut rng) {
                    println!("challenge: {change:?}");
                    let replanned = solve(args.solver, &grid, &teleports, replay.agent(), goal);
                    if !replay.set_path(replanned) {
                        // Mid-jump; the next tick replans from solid ground.
                        steps_since_challenge = interval;
                    }
                }
            }
        }
    }

    let steps = replay.steps_taken();
    let won = replay.status() == ReplayStatus::Won;
    if won {
        score += WIN_BONUS - STEP_COST * i64::from(steps);
        println!("the gold is yours in {steps} steps, score {score}");
    } else if replay.status() == ReplayStatus::Dead {
        println!("the hunt ended after {steps} steps, score {score}");
    } else {
        println!("the route ran out after {steps} steps, score {score}");
    }
    if traps_sprung > 0 {
        println!("traps sprung: {traps_sprung}");
    }

    if let Some(stats_path) = args.stats {
        let store = JsonStatsStore::new(stats_path);
        let totals = store
            .record(&GameRecord {
                difficulty: args.difficulty.label().to_owned(),
                steps,
                score,
                won,
            })
            .context("recording statistics")?;
        println!(
            "statistics: {} played, {} won, best score {}",
            totals.games_played,
            totals.gold_collected,
            totals.best_score.unwrap_or(score)
        );
    }

    Ok(())
}

/// Preset counts with any explicit per-category overrides applied.
fn resolved_profile(args: &Args) -> DifficultyProfile {
    let mut profile = args.difficulty.profile();
    if let Some(count) = args.wumpuses {
        profile.wumpus_count = count;
    }
    if let Some(count) = args.pits {
        profile.pit_count = count;
    }
    if let Some(count) = args.obstacles {
        profile.obstacle_count = count;
    }
    if let Some(count) = args.traps {
        profile.trap_count = count;
    }
    if let Some(count) = args.teleports {
        profile.teleport_count = count;
    }
    profile
}

fn solve(
    solver: Solver,
    grid: &Grid,
    teleports: &TeleportMap,
    start: CellCoord,
    goal: CellCoord,
) -> Path {
    match solver {
        Solver::Bfs => bfs(grid, start, goal),
        Solver::Astar => astar(grid, teleports, start, goal),
    }
}

/// Strict `row,col` parser for position arguments.
///
/// Splits on a single comma and validates both halves as non-negative
/// integers; anything else is a typed parse failure, never evaluated.
fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{value}`"))?;
    let row: u32 = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row `{}`", row.trim()))?;
    let column: u32 = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column `{}`", column.trim()))?;
    Ok(CellCoord::new(row, column))
}
