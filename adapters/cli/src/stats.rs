//! Durable game statistics owned entirely by the adapter.
//!
//! The kernel never reads or writes statistics; `main` injects a store and
//! feeds it one record per finished game. Failures stay inside the store's
//! error type so a broken stats file can never affect a running hunt.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sink for finished-game records.
pub(crate) trait StatsStore {
    /// Reads the accumulated statistics, defaulting when none exist yet.
    fn load(&self) -> Result<Stats, StatsError>;

    /// Folds one finished game into the store and returns the new totals.
    fn record(&self, record: &GameRecord) -> Result<Stats, StatsError>;
}

/// Accumulated statistics across every recorded game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Stats {
    /// Total games recorded.
    pub(crate) games_played: u64,
    /// Games that ended with the gold collected.
    pub(crate) gold_collected: u64,
    /// Games that ended with the agent dead.
    pub(crate) deaths: u64,
    /// Steps taken across all games.
    pub(crate) total_steps: u64,
    /// Fewest steps in any winning game.
    pub(crate) best_path_length: Option<u32>,
    /// Highest score achieved in any game.
    pub(crate) best_score: Option<i64>,
    /// Every recorded game, oldest first.
    pub(crate) history: Vec<GameRecord>,
}

impl Stats {
    fn apply(&mut self, record: &GameRecord) {
        self.games_played += 1;
        self.total_steps += u64::from(record.steps);
        if record.won {
            self.gold_collected += 1;
            self.best_path_length = Some(match self.best_path_length {
                Some(best) => best.min(record.steps),
                None => record.steps,
            });
        } else {
            self.deaths += 1;
        }
        self.best_score = Some(match self.best_score {
            Some(best) => best.max(record.score),
            None => record.score,
        });
        self.history.push(record.clone());
    }
}

/// Outcome of a single finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GameRecord {
    /// Difficulty label the game ran under.
    pub(crate) difficulty: String,
    /// Steps the agent took, synthesized jumps included.
    pub(crate) steps: u32,
    /// Final score.
    pub(crate) score: i64,
    /// Whether the gold was collected.
    pub(crate) won: bool,
}

/// Failures from the JSON-backed store.
#[derive(Debug, Error)]
pub(crate) enum StatsError {
    /// The stats file could not be read or written.
    #[error("stats file I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The stats file exists but does not parse.
    #[error("stats file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// File-backed store keeping statistics as a single JSON document.
#[derive(Clone, Debug)]
pub(crate) struct JsonStatsStore {
    path: PathBuf,
}

impl JsonStatsStore {
    /// Creates a store persisting to the provided file path.
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StatsStore for JsonStatsStore {
    fn load(&self) -> Result<Stats, StatsError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Stats::default()),
            Err(error) => Err(StatsError::Io(error)),
        }
    }

    fn record(&self, record: &GameRecord) -> Result<Stats, StatsError> {
        let mut stats = self.load()?;
        stats.apply(record);
        fs::write(&self.path, serde_json::to_string(&stats)?)?;
        Ok(stats)
    }
}
