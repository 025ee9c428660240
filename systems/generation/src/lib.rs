#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic grid generation from a difficulty profile and injected RNG.

use rand::{seq::SliceRandom, Rng};
use sha2::{Digest, Sha256};

use wumpus_hunt_core::{CellCoord, CellKind, DifficultyProfile, GridError, Hazard};
use wumpus_hunt_world::{Grid, TeleportMap};

/// Rejection-sampling attempts before falling back to a linear scan.
const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Chebyshev radius around the agent spawn kept free of placed entities.
const SPAWN_SAFETY_RADIUS: u32 = 1;

/// Minimum per-axis distance to the agent for challenge-mode placements.
const CHALLENGE_SAFE_DISTANCE: u32 = 2;

/// Populates a fresh grid from the difficulty profile.
///
/// The agent and goal markers land on the provided coordinates, then each
/// hazard category is placed in fixed order: wumpus, pit, obstacle, trap,
/// teleport. Every item samples uniformly random empty cells outside the
/// spawn safety zone, capped at [`MAX_PLACEMENT_ATTEMPTS`]; exhaustion falls
/// back to a row-major scan for the first empty cell, and a saturated grid
/// skips the remainder of the category. Teleport cells are paired by
/// shuffling the placed cells and linking adjacent elements, leaving the
/// last cell unpaired when the count is odd.
///
/// Identical inputs and RNG state reproduce the grid exactly.
///
/// # Errors
///
/// Returns [`GridError::OutOfBounds`] when the agent or goal coordinate lies
/// outside the grid.
pub fn generate<R: Rng + ?Sized>(
    size: u32,
    profile: &DifficultyProfile,
    agent: CellCoord,
    goal: CellCoord,
    rng: &mut R,
) -> Result<(Grid, TeleportMap), GridError> {
    debug_assert!(agent != goal, "agent and goal must occupy distinct cells");
    let mut grid = Grid::new(size);
    grid.set(agent, CellKind::Agent)?;
    grid.set(goal, CellKind::Goal)?;

    let _ = place_category(
        &mut grid,
        CellKind::Hazard(Hazard::Wumpus),
        profile.wumpus_count,
        agent,
        rng,
    );
    let _ = place_category(
        &mut grid,
        CellKind::Hazard(Hazard::Pit),
        profile.pit_count,
        agent,
        rng,
    );
    let _ = place_category(&mut grid, CellKind::Obstacle, profile.obstacle_count, agent, rng);
    let _ = place_category(&mut grid, CellKind::Trap, profile.trap_count, agent, rng);
    let teleport_cells = place_category(
        &mut grid,
        CellKind::Teleport,
        profile.teleport_count,
        agent,
        rng,
    );

    Ok((grid, pair_teleports(teleport_cells, rng)))
}

/// Derives a reproducible per-level seed from the global seed.
///
/// Hashing keeps the per-level streams independent: consecutive level
/// indices share no structure even though they come from one global seed.
#[must_use]
pub fn derive_level_seed(global_seed: u64, level_index: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(level_index.to_le_bytes());
    let digest = hasher.finalize();

    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Grid mutation applied by a challenge-mode tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeChange {
    /// An existing wumpus relocated to a new cell.
    WumpusMoved {
        /// Cell the wumpus vacated.
        from: CellCoord,
        /// Cell the wumpus now occupies.
        to: CellCoord,
    },
    /// A pit opened in a previously empty cell.
    PitAdded(CellCoord),
    /// A trap appeared in a previously empty cell.
    TrapAdded(CellCoord),
}

/// Mutates the grid with one random challenge-mode change.
///
/// Picks uniformly among moving a wumpus, adding a pit, and adding a trap.
/// Target cells must be empty with both coordinate distances to the agent
/// strictly greater than [`CHALLENGE_SAFE_DISTANCE`]. Returns `None` when
/// the chosen change has no eligible cell (or no wumpus exists to move);
/// callers recompute paths after a returned change.
pub fn apply_challenge_update<R: Rng + ?Sized>(
    grid: &mut Grid,
    agent: CellCoord,
    rng: &mut R,
) -> Option<ChallengeChange> {
    match rng.gen_range(0_u32..3) {
        0 => {
            let wumpuses = cells_of_kind(grid, CellKind::Hazard(Hazard::Wumpus));
            let from = *wumpuses.choose(rng)?;
            let to = find_challenge_cell(grid, agent, rng)?;
            grid.set(from, CellKind::Empty).ok()?;
            grid.set(to, CellKind::Hazard(Hazard::Wumpus)).ok()?;
            Some(ChallengeChange::WumpusMoved { from, to })
        }
        1 => {
            let cell = find_challenge_cell(grid, agent, rng)?;
            grid.set(cell, CellKind::Hazard(Hazard::Pit)).ok()?;
            Some(ChallengeChange::PitAdded(cell))
        }
        _ => {
            let cell = find_challenge_cell(grid, agent, rng)?;
            grid.set(cell, CellKind::Trap).ok()?;
            Some(ChallengeChange::TrapAdded(cell))
        }
    }
}

fn place_category<R: Rng + ?Sized>(
    grid: &mut Grid,
    kind: CellKind,
    count: u32,
    agent: CellCoord,
    rng: &mut R,
) -> Vec<CellCoord> {
    let mut placed = Vec::new();

    for _ in 0..count {
        let Some(cell) = find_placement(grid, agent, rng) else {
            break;
        };
        if grid.set(cell, kind).is_err() {
            break;
        }
        placed.push(cell);
    }

    placed
}

fn find_placement<R: Rng + ?Sized>(
    grid: &Grid,
    agent: CellCoord,
    rng: &mut R,
) -> Option<CellCoord> {
    let size = grid.size();
    if size == 0 {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if is_empty(grid, cell) && cell.chebyshev_distance(agent) > SPAWN_SAFETY_RADIUS {
            return Some(cell);
        }
    }

    // The fallback scan drops the safety-zone restriction so dense profiles
    // still fill up instead of silently losing placements.
    for row in 0..size {
        for column in 0..size {
            let cell = CellCoord::new(row, column);
            if is_empty(grid, cell) {
                return Some(cell);
            }
        }
    }

    None
}

fn find_challenge_cell<R: Rng + ?Sized>(
    grid: &Grid,
    agent: CellCoord,
    rng: &mut R,
) -> Option<CellCoord> {
    let size = grid.size();
    if size == 0 {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if is_empty(grid, cell)
            && cell.row().abs_diff(agent.row()) > CHALLENGE_SAFE_DISTANCE
            && cell.column().abs_diff(agent.column()) > CHALLENGE_SAFE_DISTANCE
        {
            return Some(cell);
        }
    }

    None
}

fn pair_teleports<R: Rng + ?Sized>(mut cells: Vec<CellCoord>, rng: &mut R) -> TeleportMap {
    cells.shuffle(rng);

    let mut teleports = TeleportMap::new();
    for pair in cells.chunks_exact(2) {
        let linked = teleports.link(pair[0], pair[1]);
        debug_assert!(linked, "shuffled teleport cells pair exactly once");
    }
    teleports
}

fn is_empty(grid: &Grid, cell: CellCoord) -> bool {
    grid.get(cell) == Ok(CellKind::Empty)
}

fn cells_of_kind(grid: &Grid, kind: CellKind) -> Vec<CellCoord> {
    let size = grid.size();
    let mut cells = Vec::new();
    for row in 0..size {
        for column in 0..size {
            let cell = CellCoord::new(row, column);
            if grid.get(cell) == Ok(kind) {
                cells.push(cell);
            }
        }
    }
    cells
}
