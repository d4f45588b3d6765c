use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use rand::Rng;
use serde_derive::Deserialize;

use crate::grid::{Grid, Pos};
use crate::solver::{solve, Path};

pub const DEFAULT_RETRY_CEILING: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Probability that a cell other than start/end is a wall.
    pub fn density(self) -> f64 {
        match self {
            Difficulty::Easy => 0.1,
            Difficulty::Medium => 0.2,
            Difficulty::Hard => 0.3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Generation {
    Solvable { grid: Grid, path: Path, attempts: u32 },
    ExhaustedRetries { attempts: u32 },
}

/// Samples random boards at `density` until one is solvable or `retry_ceiling`
/// candidates have been rejected.
pub fn generate(size: usize, density: f64, retry_ceiling: u32, rng: &mut impl Rng) -> Generation {
    for attempt in 1..=retry_ceiling {
        let grid = random_grid(size, density, rng);
        if let Some(path) = solve(&grid) {
            debug!(
                "accepted {}x{} grid with {} walls after {} attempt(s)",
                size,
                size,
                grid.wall_count(),
                attempt
            );
            return Generation::Solvable {
                grid,
                path,
                attempts: attempt,
            };
        }
    }
    Generation::ExhaustedRetries {
        attempts: retry_ceiling,
    }
}

fn random_grid(size: usize, density: f64, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::open(size);
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            // set_wall leaves start and end alone
            if rng.gen::<f64>() < density {
                grid.set_wall(Pos::new(row, col), true);
            }
        }
    }
    grid
}

/// Wraps [`generate`] with a fallback so callers always get a playable grid.
///
/// When the ceiling is hit the last accepted grid of the same size is reused;
/// failing that, a wall-free grid is handed out.
#[derive(Debug)]
pub struct MazeGenerator {
    size: usize,
    retry_ceiling: u32,
    last_good: Option<Grid>,
}

impl MazeGenerator {
    pub fn new(size: usize, retry_ceiling: u32) -> Self {
        Self {
            size: size.max(1),
            retry_ceiling: retry_ceiling.max(1),
            last_good: None,
        }
    }

    pub fn next_grid(&mut self, difficulty: Difficulty, rng: &mut impl Rng) -> Grid {
        self.next_grid_with_density(difficulty.density(), rng)
    }

    pub fn next_grid_with_density(&mut self, density: f64, rng: &mut impl Rng) -> Grid {
        match generate(self.size, density, self.retry_ceiling, rng) {
            Generation::Solvable { grid, .. } => {
                self.last_good = Some(grid.clone());
                grid
            }
            Generation::ExhaustedRetries { attempts } => match &self.last_good {
                Some(grid) => {
                    warn!(
                        "no solvable grid in {} attempts at density {}, reusing previous grid",
                        attempts, density
                    );
                    let mut grid = grid.clone();
                    grid.clear_marks();
                    grid
                }
                None => {
                    warn!(
                        "no solvable grid in {} attempts at density {}, falling back to open grid",
                        attempts, density
                    );
                    Grid::open(self.size)
                }
            },
        }
    }
}
