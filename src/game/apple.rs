//! Apple placement.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use super::config::AppleRule;
use super::grid::{Grid, Position};
use super::state::Snake;

/// Picks the cell for the next apple.
pub trait ApplePlacer {
    fn place(&mut self, grid: &Grid, snake: &Snake) -> Position;
}

/// Uniformly random placement backed by any `Rng`
pub struct RandomPlacer<R: Rng = StdRng> {
    rng: R,
    rule: AppleRule,
}

impl<R: Rng> RandomPlacer<R> {
    pub fn new(rng: R, rule: AppleRule) -> Self {
        Self { rng, rule }
    }

    pub fn rule(&self) -> AppleRule {
        self.rule
    }

    pub fn set_rule(&mut self, rule: AppleRule) {
        self.rule = rule;
    }

    fn any_cell(&mut self, grid: &Grid) -> Position {
        let col = self.rng.gen_range(0..grid.columns());
        let row = self.rng.gen_range(0..grid.rows());
        grid.cell(col, row)
    }
}

impl RandomPlacer<StdRng> {
    pub fn from_entropy(rule: AppleRule) -> Self {
        Self::new(StdRng::from_entropy(), rule)
    }

    /// Reproducible placement sequence
    pub fn seeded(seed: u64, rule: AppleRule) -> Self {
        Self::new(StdRng::seed_from_u64(seed), rule)
    }
}

impl<R: Rng> ApplePlacer for RandomPlacer<R> {
    fn place(&mut self, grid: &Grid, snake: &Snake) -> Position {
        match self.rule {
            AppleRule::Anywhere => self.any_cell(grid),
            AppleRule::AvoidSnake => {
                let free = grid.cells().filter(|cell| !snake.contains(*cell));
                match free.choose(&mut self.rng) {
                    Some(cell) => cell,
                    // Board is full; nowhere better to go
                    None => self.any_cell(grid),
                }
            }
        }
    }
}
