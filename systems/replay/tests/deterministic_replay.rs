use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wumpus_hunt_core::{CellCoord, CellKind, DifficultyProfile, ReplayStatus, StepResult};
use wumpus_hunt_system_generation::generate;
use wumpus_hunt_system_pathfinding::astar;
use wumpus_hunt_system_replay::Replay;
use wumpus_hunt_world::Grid;

const SIZE: u32 = 10;
const SEED: u64 = 0x77a5_1045;

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay_session(SEED, DifficultyProfile::HARD);
    let second = replay_session(SEED, DifficultyProfile::HARD);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn replay_terminates_in_a_final_state_or_exhausts_the_path() {
    for seed in 0..8 {
        let outcome = replay_session(seed, DifficultyProfile::HARD);
        if outcome.path_found {
            assert!(
                matches!(outcome.status, ReplayStatus::Won | ReplayStatus::Dead)
                    || outcome.remaining == 0,
                "seed {seed}: replay stalled mid-path"
            );
        } else {
            assert!(outcome.events.is_empty(), "seed {seed}: stepped without a path");
        }
    }
}

#[test]
fn winning_replays_end_with_the_collected_goal() {
    let mut winning_seeds = 0;
    for seed in 0..16 {
        let outcome = replay_session(seed, DifficultyProfile::EASY);
        if outcome.status == ReplayStatus::Won {
            winning_seeds += 1;
            assert_eq!(outcome.events.last(), Some(&EventRecord::CollectedGoal));
        }
    }
    assert!(winning_seeds > 0, "no seed in the sample produced a win");
}

fn replay_session(seed: u64, profile: DifficultyProfile) -> ReplayOutcome {
    let agent = CellCoord::new(0, 0);
    let goal = CellCoord::new(SIZE - 1, SIZE - 1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (mut grid, teleports) = generate(SIZE, &profile, agent, goal, &mut rng)
        .expect("generation succeeds");

    let path = astar(&grid, &teleports, agent, goal);
    let path_found = !path.is_empty();
    let mut replay = Replay::new(agent, path);
    let mut events = Vec::new();

    while !replay.status().is_terminal() && (replay.remaining() > 0 || events_pending(&events)) {
        match replay.step(&mut grid, &teleports) {
            Ok(result) => events.push(EventRecord::from(result)),
            Err(_) => break,
        }
    }

    ReplayOutcome {
        events,
        status: replay.status(),
        agent: replay.agent(),
        remaining: replay.remaining(),
        path_found,
        trail_cells: grid.count(CellKind::Trail),
    }
}

/// A `Teleported` record at the tail means a synthesized jump is still due.
fn events_pending(events: &[EventRecord]) -> bool {
    matches!(events.last(), Some(EventRecord::Teleported { .. }))
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    events: Vec<EventRecord>,
    status: ReplayStatus,
    agent: CellCoord,
    remaining: usize,
    path_found: bool,
    trail_cells: usize,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Moved(CellCoord),
    CollectedGoal,
    Died,
    Trapped(u32),
    Teleported { from: CellCoord, to: CellCoord },
}

impl From<StepResult> for EventRecord {
    fn from(result: StepResult) -> Self {
        match result {
            StepResult::Moved(cell) => Self::Moved(cell),
            StepResult::CollectedGoal => Self::CollectedGoal,
            StepResult::Died(_) => Self::Died,
            StepResult::Trapped(penalty) => Self::Trapped(penalty),
            StepResult::Teleported { from, to } => Self::Teleported { from, to },
        }
    }
}

#[test]
fn replay_follows_the_teleport_continuation() {
    // Mirror of the teleport scenario: wall on column 2 with a bottom gap,
    // pair at (1,1)↔(3,3). The driver must report the pair entry, the jump,
    // and then continuation from the exit.
    let start = CellCoord::new(0, 0);
    let goal = CellCoord::new(0, 4);
    let mut grid = Grid::new(5);
    grid.set(start, CellKind::Agent).expect("set");
    grid.set(goal, CellKind::Goal).expect("set");
    for row in 0..4 {
        grid.set(CellCoord::new(row, 2), CellKind::Obstacle).expect("set");
    }
    grid.set(CellCoord::new(1, 1), CellKind::Teleport).expect("set");
    grid.set(CellCoord::new(3, 3), CellKind::Teleport).expect("set");
    let mut teleports = wumpus_hunt_world::TeleportMap::new();
    assert!(teleports.link(CellCoord::new(1, 1), CellCoord::new(3, 3)));

    let path = astar(&grid, &teleports, start, goal);
    let mut replay = Replay::new(start, path);

    let mut results = Vec::new();
    while !replay.status().is_terminal() {
        results.push(replay.step(&mut grid, &teleports).expect("replay steps"));
    }

    let teleport_index = results
        .iter()
        .position(|result| matches!(result, StepResult::Teleported { .. }))
        .expect("route crosses the teleport");
    assert_eq!(
        results[teleport_index],
        StepResult::Teleported {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(3, 3),
        }
    );
    assert_eq!(
        results[teleport_index + 1],
        StepResult::Moved(CellCoord::new(3, 3))
    );
    assert_eq!(results.last(), Some(&StepResult::CollectedGoal));
    assert_eq!(replay.status(), ReplayStatus::Won);
}
