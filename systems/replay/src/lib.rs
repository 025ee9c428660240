#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateful driver that walks an agent along a found path.
//!
//! The driver owns the replay cursor: each [`Replay::step`] call consumes
//! one path element, mutates the grid (vacated cell becomes a trail, the
//! entered cell takes the agent marker), and reports what happened as a
//! [`StepResult`] for the caller to render. Stepping onto a paired teleport
//! queues a synthesized second move, so one logical step surfaces as two
//! sequential results: `Teleported` on arrival at the entry, then `Moved`
//! after emerging at the partner.

use std::collections::VecDeque;

use wumpus_hunt_core::{
    CellCoord, CellKind, Path, ReplayError, ReplayStatus, StepResult, TRAP_PENALTY,
};
use wumpus_hunt_world::{Grid, TeleportMap};

/// Replay session stepping an agent along a precomputed path.
#[derive(Clone, Debug)]
pub struct Replay {
    agent: CellCoord,
    path: VecDeque<CellCoord>,
    pending_jump: Option<PendingJump>,
    status: ReplayStatus,
    steps_taken: u32,
}

impl Replay {
    /// Creates a replay for an agent standing at `start` with the route the
    /// pathfinder produced.
    #[must_use]
    pub fn new(start: CellCoord, path: Path) -> Self {
        Self {
            agent: start,
            path: path.into_vec().into(),
            pending_jump: None,
            status: ReplayStatus::Idle,
            steps_taken: 0,
        }
    }

    /// Current lifecycle state of the replay.
    #[must_use]
    pub const fn status(&self) -> ReplayStatus {
        self.status
    }

    /// Cell the agent currently occupies.
    #[must_use]
    pub const fn agent(&self) -> CellCoord {
        self.agent
    }

    /// Number of successful steps performed so far, synthesized jumps
    /// included.
    #[must_use]
    pub const fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Path elements not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    /// Replaces the remaining route, used after a challenge update forces a
    /// recompute from the agent's current cell.
    ///
    /// The new path must start adjacent to the agent; terminal replays and
    /// replays with an unfinished teleport jump reject the swap. An empty
    /// path is accepted and simply clears the route. Returns whether the
    /// path was installed.
    pub fn set_path(&mut self, path: Path) -> bool {
        if self.status.is_terminal() || self.pending_jump.is_some() {
            return false;
        }

        let cells = path.into_vec();
        if let Some(first) = cells.first() {
            if self.agent.manhattan_distance(*first) != 1 {
                return false;
            }
        }

        self.path = cells.into();
        true
    }

    /// Advances the agent by one step, mutating the grid in place.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::InvalidState`] when the replay already reached
    /// a terminal state or the path is exhausted, and propagates
    /// [`ReplayError::Grid`] when a path element leaves the grid.
    pub fn step(
        &mut self,
        grid: &mut Grid,
        teleports: &TeleportMap,
    ) -> Result<StepResult, ReplayError> {
        if self.status.is_terminal() {
            return Err(ReplayError::InvalidState(self.status));
        }

        if let Some(jump) = self.pending_jump.take() {
            self.relocate(grid, jump.to)?;
            // Arrival by jump never re-triggers the destination teleport.
            return Ok(StepResult::Moved(jump.to));
        }

        let Some(next) = self.path.pop_front() else {
            return Err(ReplayError::InvalidState(self.status));
        };

        let kind = grid.get(next)?;
        self.relocate(grid, next)?;

        match kind {
            CellKind::Goal => {
                self.status = ReplayStatus::Won;
                Ok(StepResult::CollectedGoal)
            }
            CellKind::Hazard(hazard) => {
                self.status = ReplayStatus::Dead;
                Ok(StepResult::Died(hazard))
            }
            CellKind::Trap => Ok(StepResult::Trapped(TRAP_PENALTY)),
            CellKind::Teleport => match teleports.partner(next) {
                Some(partner) => {
                    self.pending_jump = Some(PendingJump { to: partner });
                    Ok(StepResult::Teleported {
                        from: next,
                        to: partner,
                    })
                }
                // A dead teleport is an ordinary cell.
                None => Ok(StepResult::Moved(next)),
            },
            CellKind::Empty | CellKind::Agent | CellKind::Trail | CellKind::Obstacle => {
                Ok(StepResult::Moved(next))
            }
        }
    }

    fn relocate(&mut self, grid: &mut Grid, destination: CellCoord) -> Result<(), ReplayError> {
        grid.set(destination, CellKind::Agent)?;
        grid.set(self.agent, CellKind::Trail)?;
        self.agent = destination;
        self.status = ReplayStatus::Stepping;
        self.steps_taken += 1;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingJump {
    to: CellCoord,
}
