// Headless game state and rules
//
// This is the only place the live snake and food are mutated. It applies the
// move chosen by the policy, resolves collisions with the vacating-tail rule,
// grows the snake on food and respawns food from an injected random source.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::config::BoardConfig;
use crate::grid::Grid;
use crate::types::{Coord, Direction};

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Head left the board
    Wall,
    /// Head entered a body cell that was not vacating
    SelfCollision,
}

/// Result of applying one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Died(CollisionType),
}

/// Picks a free cell uniformly at random, or None when the board is full.
/// Candidates are enumerated column by column so a seeded source is reproducible.
pub fn spawn_food<R: Rng + ?Sized>(grid: &Grid, body: &VecDeque<Coord>, rng: &mut R) -> Option<Coord> {
    let occupied: HashSet<Coord> = body.iter().copied().collect();
    let free: Vec<Coord> = grid.cells().filter(|c| !occupied.contains(c)).collect();
    free.choose(rng).copied()
}

/// Live state of one game session
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    snake: VecDeque<Coord>,
    direction: Direction,
    food: Option<Coord>,
    score: u32,
    alive: bool,
}

impl Game {
    /// Starts a game: straight snake of `start_len` cells, head at the board
    /// centre, body trailing toward -x, food already placed.
    pub fn new<R: Rng + ?Sized>(board: &BoardConfig, rng: &mut R) -> Self {
        let grid = board.grid();
        let (cx, cy) = (board.cols / 2, board.rows / 2);
        let snake: VecDeque<Coord> = (0..board.start_len as i32)
            .map(|i| Coord::new(cx - i, cy))
            .collect();
        let food = spawn_food(&grid, &snake, rng);

        Game {
            grid,
            snake,
            direction: Direction::Right,
            food,
            score: 0,
            alive: true,
        }
    }

    /// Builds a game from an explicit position, for scenarios and replays
    pub fn from_parts(grid: Grid, body: &[Coord], food: Option<Coord>, score: u32) -> Self {
        let direction = match body {
            [head, neck, ..] => Direction::between(*neck, *head).unwrap_or(Direction::Right),
            _ => Direction::Right,
        };
        Game {
            grid,
            snake: body.iter().copied().collect(),
            direction,
            food,
            score,
            alive: !body.is_empty(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Contiguous copy of the body, head first
    pub fn body(&self) -> Vec<Coord> {
        self.snake.iter().copied().collect()
    }

    pub fn head(&self) -> Option<Coord> {
        self.snake.front().copied()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn food(&self) -> Option<Coord> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Snake occupies every cell
    pub fn is_cleared(&self) -> bool {
        self.snake.len() >= self.grid.cell_count()
    }

    /// Applies `next` as the new head position
    pub fn step<R: Rng + ?Sized>(&mut self, next: Coord, rng: &mut R) -> StepOutcome {
        if !self.grid.in_bounds(next) {
            self.alive = false;
            return StepOutcome::Died(CollisionType::Wall);
        }

        let tail = match self.snake.back() {
            Some(&tail) => tail,
            None => {
                self.alive = false;
                return StepOutcome::Died(CollisionType::SelfCollision);
            }
        };
        let will_eat = self.food == Some(next);

        if self.snake.contains(&next) && (next != tail || will_eat) {
            self.alive = false;
            return StepOutcome::Died(CollisionType::SelfCollision);
        }

        if let Some(dir) = self.head().and_then(|head| Direction::between(head, next)) {
            self.direction = dir;
        }
        self.snake.push_front(next);

        if will_eat {
            self.score += 1;
            self.food = spawn_food(&self.grid, &self.snake, rng);
            StepOutcome::Ate
        } else {
            self.snake.pop_back();
            StepOutcome::Moved
        }
    }
}
