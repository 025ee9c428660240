//! Plain-text board rendering for the command-line adapter.

use wumpus_hunt_core::{CellCoord, CellKind, Hazard, StepResult};
use wumpus_hunt_world::Grid;

/// Renders the grid as one character per cell, row by row.
pub(crate) fn render_grid(grid: &Grid) -> String {
    let size = grid.size();
    let mut output = String::new();
    for row in 0..size {
        for column in 0..size {
            let kind = grid
                .get(CellCoord::new(row, column))
                .unwrap_or(CellKind::Empty);
            output.push(cell_symbol(kind));
        }
        output.push('\n');
    }
    output
}

/// Legend printed above traced boards.
pub(crate) const LEGEND: &str =
    "A agent  G gold  W wumpus  P pit  O obstacle  X trap  T teleport  + trail  . empty";

fn cell_symbol(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => '.',
        CellKind::Agent => 'A',
        CellKind::Goal => 'G',
        CellKind::Hazard(Hazard::Wumpus) => 'W',
        CellKind::Hazard(Hazard::Pit) => 'P',
        CellKind::Obstacle => 'O',
        CellKind::Trap => 'X',
        CellKind::Teleport => 'T',
        CellKind::Trail => '+',
    }
}

/// One-line narration of a replay step.
pub(crate) fn describe(result: StepResult) -> String {
    match result {
        StepResult::Moved(cell) => {
            format!("moved to ({}, {})", cell.row(), cell.column())
        }
        StepResult::CollectedGoal => "collected the gold!".to_owned(),
        StepResult::Died(Hazard::Wumpus) => "walked into the wumpus".to_owned(),
        StepResult::Died(Hazard::Pit) => "fell into a pit".to_owned(),
        StepResult::Trapped(penalty) => {
            format!("sprang a trap (-{penalty} points)")
        }
        StepResult::Teleported { from, to } => format!(
            "entered the teleport at ({}, {}) bound for ({}, {})",
            from.row(),
            from.column(),
            to.row(),
            to.column()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{describe, render_grid};
    use wumpus_hunt_core::{CellCoord, CellKind, Hazard, StepResult};
    use wumpus_hunt_world::Grid;

    #[test]
    fn renders_one_symbol_per_cell() {
        let mut grid = Grid::new(3);
        grid.set(CellCoord::new(0, 0), CellKind::Agent).expect("set");
        grid.set(CellCoord::new(2, 2), CellKind::Goal).expect("set");
        grid.set(CellCoord::new(1, 1), CellKind::Hazard(Hazard::Pit))
            .expect("set");
        grid.set(CellCoord::new(1, 2), CellKind::Trap).expect("set");

        assert_eq!(render_grid(&grid), "A..\n.PX\n..G\n");
    }

    #[test]
    fn step_narration_names_the_cause() {
        assert_eq!(
            describe(StepResult::Moved(CellCoord::new(2, 3))),
            "moved to (2, 3)"
        );
        assert_eq!(
            describe(StepResult::Died(Hazard::Wumpus)),
            "walked into the wumpus"
        );
        assert_eq!(describe(StepResult::Trapped(100)), "sprang a trap (-100 points)");
    }
}
