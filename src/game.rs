use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::config::Settings;
use crate::generator::{Difficulty, MazeGenerator};
use crate::grid::{step, Dir, Grid, Pos};
use crate::solver::{is_valid_path, solve};
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Moving,
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocked {
    Wall,
    OutOfBounds,
}

impl Blocked {
    pub fn message(self) -> &'static str {
        match self {
            Blocked::Wall => "That way is blocked. Try another direction.",
            Blocked::OutOfBounds => "You can't leave the maze.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Won,
    Blocked(Blocked),
    /// Input while the win overlay is showing.
    Ignored,
}

const WIN_MESSAGE: &str = "You found the way out! A new maze is on its way.";
const HINT_MESSAGE: &str = "Take your time. Follow the dots if you'd like a hint.";

pub struct Game {
    grid: Grid,
    player: Pos,
    state: PlayState,
    difficulty: Difficulty,
    generator: MazeGenerator,
    inactivity: Timer,
    win_delay: Timer,
    message: Option<&'static str>,
    moves: u32,
    solved: u32,
    generation: u32,
}

impl Game {
    pub fn new(settings: &Settings, rng: &mut impl Rng) -> Self {
        let mut generator = MazeGenerator::new(settings.size, settings.retry_ceiling);
        let grid = generator.next_grid(settings.difficulty, rng);
        Self::build(settings, generator, grid)
    }

    /// Starts on a caller-supplied grid instead of a generated one.
    pub fn with_grid(settings: &Settings, grid: Grid) -> Self {
        let generator = MazeGenerator::new(grid.size(), settings.retry_ceiling);
        Self::build(settings, generator, grid)
    }

    fn build(settings: &Settings, generator: MazeGenerator, grid: Grid) -> Self {
        let mut game = Game {
            grid,
            player: Pos::new(0, 0),
            state: PlayState::Idle,
            difficulty: settings.difficulty,
            generator,
            inactivity: Timer::new(settings.hint_delay()),
            win_delay: Timer::new(settings.win_delay()),
            message: None,
            moves: 0,
            solved: 0,
            generation: 0,
        };
        game.reset_board();
        game
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn won(&self) -> bool {
        self.state == PlayState::Won
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn solved(&self) -> u32 {
        self.solved
    }

    /// Bumped every time a fresh grid replaces the current one.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn try_move(&mut self, dir: Dir) -> MoveOutcome {
        if self.state == PlayState::Won {
            return MoveOutcome::Ignored;
        }
        let target = match step(self.player, dir, self.grid.size()) {
            Some(target) => target,
            None => return self.reject(Blocked::OutOfBounds),
        };
        if self.grid.cell(target).is_wall {
            return self.reject(Blocked::Wall);
        }

        self.player = target;
        self.grid.mark_visited(target);
        self.moves += 1;
        self.message = None;
        self.inactivity.start();

        if self.grid.cell(target).is_end {
            self.state = PlayState::Won;
            self.solved += 1;
            self.message = Some(WIN_MESSAGE);
            self.inactivity.cancel();
            self.win_delay.start();
            info!("maze solved in {} moves", self.moves);
            return MoveOutcome::Won;
        }
        self.state = PlayState::Moving;
        MoveOutcome::Moved
    }

    fn reject(&mut self, reason: Blocked) -> MoveOutcome {
        self.message = Some(reason.message());
        MoveOutcome::Blocked(reason)
    }

    /// Advances both timers by `dt`.
    pub fn update(&mut self, dt: Duration, rng: &mut impl Rng) {
        if self.win_delay.advance(dt) {
            self.new_maze(rng);
            return;
        }
        if self.inactivity.advance(dt) {
            self.reveal_hint();
        }
    }

    fn reveal_hint(&mut self) {
        if self.grid.has_hint() {
            return;
        }
        match solve(&self.grid) {
            Some(path) => {
                debug_assert!(is_valid_path(&self.grid, &path));
                debug!("revealing hint path of {} cells", path.len());
                self.grid.mark_hint_path(&path);
                self.message = Some(HINT_MESSAGE);
            }
            None => debug!("current grid has no path to hint"),
        }
    }

    pub fn new_maze(&mut self, rng: &mut impl Rng) {
        self.grid = self.generator.next_grid(self.difficulty, rng);
        self.generation += 1;
        self.reset_board();
        debug!(
            "grid #{} ready at {} difficulty",
            self.generation, self.difficulty
        );
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty, rng: &mut impl Rng) {
        if difficulty == self.difficulty {
            return;
        }
        info!("difficulty changed to {}", difficulty);
        self.difficulty = difficulty;
        self.new_maze(rng);
    }

    fn reset_board(&mut self) {
        self.grid.clear_marks();
        self.player = self.grid.start();
        self.grid.mark_visited(self.player);
        self.state = PlayState::Idle;
        self.moves = 0;
        self.message = None;
        self.win_delay.cancel();
        self.inactivity.start();
    }

    /// Stops all pending timers at the end of a session.
    pub fn shutdown(&mut self) {
        self.inactivity.cancel();
        self.win_delay.cancel();
        info!("session ended after {} solved maze(s)", self.solved);
    }

    pub fn timers_running(&self) -> bool {
        self.inactivity.is_running() || self.win_delay.is_running()
    }
}
