#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pathfinding over the authoritative grid.
//!
//! Both searches are functions of their inputs alone: they hold no state
//! between calls, so re-running after the grid mutates reflects the new
//! obstacle set. Cells are expanded through [`Grid::neighbors`], whose
//! fixed up, down, left, right order determines tie-breaking and makes
//! every search reproducible.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, VecDeque},
};

use wumpus_hunt_core::{CellCoord, CellKind, Path};
use wumpus_hunt_world::{Grid, TeleportMap};

/// Extra cost charged for stepping onto any teleport cell.
///
/// The surcharge applies to paired and dead teleports alike, so a teleport
/// route of equal raw length always loses to the direct route and teleport
/// loops stay unattractive.
pub const TELEPORT_SURCHARGE: u32 = 1;

/// Finds the shortest path by edge count over passable cells.
///
/// Explores with a FIFO frontier and a visited set, so the result is the
/// shortest path among passable cells under unit edge weights. Teleports are
/// traversed as ordinary cells. Returns the empty path when the goal is
/// unreachable, when `start == goal` (callers check equality first), or
/// when either endpoint lies outside the grid.
#[must_use]
pub fn bfs(grid: &Grid, start: CellCoord, goal: CellCoord) -> Path {
    if start == goal || !grid.contains(start) || !grid.contains(goal) {
        return Path::empty();
    }

    let node_count = grid.cells().len();
    let mut visited = vec![false; node_count];
    let mut parents: Vec<Option<CellCoord>> = vec![None; node_count];
    let mut frontier = VecDeque::new();

    let Some(start_index) = grid.index(start) else {
        return Path::empty();
    };
    visited[start_index] = true;
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        if cell == goal {
            return reconstruct_bfs(&parents, grid, start, goal);
        }

        for neighbor in grid.neighbors(cell) {
            let Some(index) = grid.index(neighbor) else {
                continue;
            };
            if visited[index] {
                continue;
            }
            let Ok(kind) = grid.get(neighbor) else {
                continue;
            };
            if !kind.is_passable() {
                continue;
            }

            visited[index] = true;
            parents[index] = Some(cell);
            frontier.push_back(neighbor);
        }
    }

    Path::empty()
}

/// Finds the cheapest path under move costs with teleport transport.
///
/// Every move costs 1; stepping onto a teleport cell costs an additional
/// [`TELEPORT_SURCHARGE`]. Entering a paired teleport transports the search
/// to the partner cell, and the stored path keeps the entry cell while the
/// replay driver synthesizes the jump. The frontier is a binary heap
/// ordered by `f = g + h` with ties broken by insertion order; the search
/// relaxes until the frontier drains, so the returned path is cheapest even
/// when teleport shortcuts undercut the heuristic. Returns the empty path
/// under the same conditions as [`bfs`].
#[must_use]
pub fn astar(grid: &Grid, teleports: &TeleportMap, start: CellCoord, goal: CellCoord) -> Path {
    if start == goal || !grid.contains(start) || !grid.contains(goal) {
        return Path::empty();
    }

    let node_count = grid.cells().len();
    let mut best_costs = vec![u32::MAX; node_count];
    let mut parents: Vec<Option<Parent>> = vec![None; node_count];
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0_u64;

    let Some(start_index) = grid.index(start) else {
        return Path::empty();
    };
    best_costs[start_index] = 0;
    frontier.push(OpenEntry {
        priority: heuristic(start, goal, teleports),
        cost: 0,
        sequence,
        cell: start,
    });

    let Some(goal_index) = grid.index(goal) else {
        return Path::empty();
    };
    while let Some(entry) = frontier.pop() {
        let Some(entry_index) = grid.index(entry.cell) else {
            continue;
        };
        if entry.cost > best_costs[entry_index] {
            continue;
        }
        if entry.cost >= best_costs[goal_index] {
            continue;
        }

        for neighbor in grid.neighbors(entry.cell) {
            let Ok(kind) = grid.get(neighbor) else {
                continue;
            };
            if !kind.is_passable() {
                continue;
            }

            let mut move_cost = 1;
            let mut landing = neighbor;
            if kind == CellKind::Teleport {
                move_cost += TELEPORT_SURCHARGE;
                if let Some(partner) = teleports.partner(neighbor) {
                    landing = partner;
                }
            }

            let Some(landing_index) = grid.index(landing) else {
                continue;
            };
            let tentative = entry.cost.saturating_add(move_cost);
            if tentative >= best_costs[landing_index] {
                continue;
            }

            best_costs[landing_index] = tentative;
            parents[landing_index] = Some(Parent {
                standing: entry.cell,
                entered: neighbor,
            });
            sequence += 1;
            frontier.push(OpenEntry {
                priority: tentative.saturating_add(heuristic(landing, goal, teleports)),
                cost: tentative,
                sequence,
                cell: landing,
            });
        }
    }

    if best_costs[goal_index] == u32::MAX {
        return Path::empty();
    }
    reconstruct_astar(&parents, grid, start, goal)
}

/// Lower-bound estimate of the remaining cost from `cell` to `goal`.
///
/// Takes the Manhattan distance and, for each teleport pair, the distance to
/// one endpoint plus the surcharge-inclusive entry cost plus the distance
/// from the other endpoint. Guides expansion toward profitable wormholes;
/// correctness never depends on it because the search drains the frontier.
fn heuristic(cell: CellCoord, goal: CellCoord, teleports: &TeleportMap) -> u32 {
    let mut estimate = cell.manhattan_distance(goal);
    for (first, second) in teleports.pairs() {
        let via_first = cell
            .manhattan_distance(first)
            .saturating_add(TELEPORT_SURCHARGE)
            .saturating_add(second.manhattan_distance(goal));
        let via_second = cell
            .manhattan_distance(second)
            .saturating_add(TELEPORT_SURCHARGE)
            .saturating_add(first.manhattan_distance(goal));
        estimate = estimate.min(via_first).min(via_second);
    }
    estimate
}

#[derive(Clone, Copy, Debug)]
struct Parent {
    /// Cell the agent stood on before the move.
    standing: CellCoord,
    /// Cell the move consumed; differs from the landing cell after a jump.
    entered: CellCoord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    priority: u32,
    cost: u32,
    sequence: u64,
    cell: CellCoord,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the lowest priority; earlier
        // insertions win ties.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

fn reconstruct_bfs(
    parents: &[Option<CellCoord>],
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
) -> Path {
    let mut cells = Vec::new();
    let mut cursor = goal;

    while cursor != start {
        cells.push(cursor);
        let Some(parent) = grid.index(cursor).and_then(|index| parents[index]) else {
            return Path::empty();
        };
        cursor = parent;
    }

    cells.reverse();
    Path::from_cells(cells)
}

fn reconstruct_astar(parents: &[Option<Parent>], grid: &Grid, start: CellCoord, goal: CellCoord) -> Path {
    let mut cells = Vec::new();
    let mut cursor = goal;

    while cursor != start {
        let Some(parent) = grid.index(cursor).and_then(|index| parents[index]) else {
            return Path::empty();
        };
        cells.push(parent.entered);
        cursor = parent.standing;
    }

    cells.reverse();
    Path::from_cells(cells)
}

#[cfg(test)]
mod tests {
    use super::{astar, bfs};
    use wumpus_hunt_core::{CellCoord, CellKind, Path};
    use wumpus_hunt_world::{Grid, TeleportMap};

    fn open_grid(size: u32, agent: CellCoord, goal: CellCoord) -> Grid {
        let mut grid = Grid::new(size);
        grid.set(agent, CellKind::Agent).expect("agent in bounds");
        grid.set(goal, CellKind::Goal).expect("goal in bounds");
        grid
    }

    #[test]
    fn open_five_by_five_yields_an_eight_cell_path() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(4, 4);
        let grid = open_grid(5, start, goal);
        let teleports = TeleportMap::new();

        let via_bfs = bfs(&grid, start, goal);
        let via_astar = astar(&grid, &teleports, start, goal);

        assert_eq!(via_bfs.len(), 8);
        assert_eq!(via_astar.len(), 8);
        assert_eq!(via_bfs.last(), Some(goal));
        assert_eq!(via_astar.last(), Some(goal));
    }

    #[test]
    fn separating_wall_defeats_both_searches() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(4, 4);
        let mut grid = open_grid(5, start, goal);
        for row in 0..5 {
            grid.set(CellCoord::new(row, 2), CellKind::Obstacle)
                .expect("wall in bounds");
        }
        let teleports = TeleportMap::new();

        assert!(bfs(&grid, start, goal).is_empty());
        assert!(astar(&grid, &teleports, start, goal).is_empty());
    }

    #[test]
    fn coincident_endpoints_yield_the_empty_path() {
        let cell = CellCoord::new(2, 2);
        let grid = Grid::new(5);
        assert!(bfs(&grid, cell, cell).is_empty());
        assert!(astar(&grid, &TeleportMap::new(), cell, cell).is_empty());
    }

    #[test]
    fn endpoints_outside_the_grid_yield_the_empty_path() {
        let grid = Grid::new(4);
        let outside = CellCoord::new(4, 1);
        let inside = CellCoord::new(0, 0);
        assert!(bfs(&grid, outside, inside).is_empty());
        assert!(bfs(&grid, inside, outside).is_empty());
        assert!(astar(&grid, &TeleportMap::new(), inside, outside).is_empty());
    }

    #[test]
    fn bfs_detours_around_wumpuses_but_crosses_pits() {
        use wumpus_hunt_core::Hazard;

        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(0, 2);
        let mut grid = open_grid(3, start, goal);
        grid.set(CellCoord::new(0, 1), CellKind::Hazard(Hazard::Wumpus))
            .expect("set");

        // The wumpus blocks the straight line; the detour costs two extra.
        assert_eq!(bfs(&grid, start, goal).len(), 4);

        grid.set(CellCoord::new(0, 1), CellKind::Hazard(Hazard::Pit))
            .expect("set");
        let through_pit = bfs(&grid, start, goal);
        assert_eq!(through_pit.len(), 2);
        assert_eq!(through_pit.cells()[0], CellCoord::new(0, 1));
    }

    #[test]
    fn searches_are_idempotent_on_an_unmutated_grid() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(3, 3);
        let mut grid = open_grid(4, start, goal);
        grid.set(CellCoord::new(1, 1), CellKind::Obstacle).expect("set");
        let teleports = TeleportMap::new();

        assert_eq!(bfs(&grid, start, goal), bfs(&grid, start, goal));
        assert_eq!(
            astar(&grid, &teleports, start, goal),
            astar(&grid, &teleports, start, goal)
        );
    }

    #[test]
    fn rerunning_after_mutation_reflects_the_new_obstacles() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(0, 2);
        let mut grid = open_grid(3, start, goal);
        let teleports = TeleportMap::new();

        let before = astar(&grid, &teleports, start, goal);
        assert_eq!(before.len(), 2);

        grid.set(CellCoord::new(0, 1), CellKind::Obstacle).expect("set");
        let after = astar(&grid, &teleports, start, goal);
        assert_eq!(after.len(), 4);
    }

    fn teleport_scenario() -> (Grid, TeleportMap, CellCoord, CellCoord) {
        // Column 2 is walled except at the bottom row, making the direct
        // route twelve moves. The (1,1)↔(3,3) pair shortcuts past the wall.
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(0, 4);
        let mut grid = open_grid(5, start, goal);
        for row in 0..4 {
            grid.set(CellCoord::new(row, 2), CellKind::Obstacle)
                .expect("wall in bounds");
        }
        grid.set(CellCoord::new(1, 1), CellKind::Teleport).expect("set");
        grid.set(CellCoord::new(3, 3), CellKind::Teleport).expect("set");
        let mut teleports = TeleportMap::new();
        assert!(teleports.link(CellCoord::new(1, 1), CellCoord::new(3, 3)));
        (grid, teleports, start, goal)
    }

    #[test]
    fn astar_routes_through_a_profitable_teleport() {
        let (grid, teleports, start, goal) = teleport_scenario();

        let path = astar(&grid, &teleports, start, goal);
        assert_eq!(path.len(), 6);
        assert_eq!(path.cells()[1], CellCoord::new(1, 1));
        assert_eq!(path.last(), Some(goal));

        // The teleport-blind search walks around the wall instead.
        assert_eq!(bfs(&grid, start, goal).len(), 12);
    }

    #[test]
    fn equal_raw_length_resolves_to_the_direct_route() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(0, 2);
        let mut grid = open_grid(3, start, goal);
        grid.set(CellCoord::new(1, 0), CellKind::Teleport).expect("set");
        grid.set(CellCoord::new(1, 2), CellKind::Teleport).expect("set");
        let mut teleports = TeleportMap::new();
        assert!(teleports.link(CellCoord::new(1, 0), CellCoord::new(1, 2)));

        // Two moves either way, but the surcharge prices the teleport at
        // three, so the direct route wins.
        let path = astar(&grid, &teleports, start, goal);
        assert_eq!(
            path.cells(),
            &[CellCoord::new(0, 1), CellCoord::new(0, 2)]
        );
    }

    #[test]
    fn dead_teleports_cost_extra_but_do_not_transport() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(0, 2);
        let mut grid = open_grid(3, start, goal);
        grid.set(CellCoord::new(0, 1), CellKind::Teleport).expect("set");
        let teleports = TeleportMap::new();

        // Straight through the dead teleport costs three, still one short of
        // the four-move detour around it.
        let path = astar(&grid, &teleports, start, goal);
        assert_eq!(
            path.cells(),
            &[CellCoord::new(0, 1), CellCoord::new(0, 2)]
        );
    }

    #[test]
    fn unreachable_reconstruction_never_panics() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(2, 2);
        let mut grid = open_grid(3, start, goal);
        for cell in [
            CellCoord::new(0, 1),
            CellCoord::new(1, 0),
            CellCoord::new(1, 1),
        ] {
            grid.set(cell, CellKind::Obstacle).expect("set");
        }

        assert_eq!(bfs(&grid, start, goal), Path::empty());
        assert_eq!(astar(&grid, &TeleportMap::new(), start, goal), Path::empty());
    }
}
