// Look-ahead safety simulator
//
// Applies a hypothetical move (or a whole path) to a copy of the snake and
// checks that the head can still reach its own tail afterwards. A snake that
// can always reach its tail can keep circling without trapping itself.
// Nothing here touches live game state.

use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::search::connected;
use crate::types::Coord;

/// Transient copy of a snake body with an occupancy index
#[derive(Debug, Clone)]
pub struct VirtualSnake {
    cells: VecDeque<Coord>,
    occupied: HashSet<Coord>,
}

impl VirtualSnake {
    /// Copies `body` (head first). Returns None for an empty body.
    pub fn from_body(body: &[Coord]) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        Some(VirtualSnake {
            cells: body.iter().copied().collect(),
            occupied: body.iter().copied().collect(),
        })
    }

    pub fn head(&self) -> Coord {
        self.cells[0]
    }

    pub fn tail(&self) -> Coord {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.occupied.contains(&pos)
    }

    /// Pushes a new head; the tail is popped unless the snake grows
    pub fn advance(&mut self, to: Coord, grow: bool) {
        if !grow {
            if let Some(old_tail) = self.cells.pop_back() {
                self.occupied.remove(&old_tail);
            }
        }
        self.cells.push_front(to);
        self.occupied.insert(to);
    }

    /// All occupied cells except the current tail
    pub fn blocked_except_tail(&self) -> HashSet<Coord> {
        let mut blocked = self.occupied.clone();
        blocked.remove(&self.tail());
        blocked
    }

    /// Escape check: the head can reach the tail through cells not in the body
    pub fn head_reaches_tail(&self, grid: &Grid) -> bool {
        connected(grid, self.head(), self.tail(), &self.blocked_except_tail())
    }
}

/// Would stepping the head onto `mv` keep a head-to-tail escape route?
///
/// Rejects out-of-bounds moves and moves into any body cell other than the
/// tail. The tail is only exempt when the move does not eat, because eating
/// keeps the tail in place.
pub fn simulate_single_move_safe(
    grid: &Grid,
    body: &[Coord],
    food: Option<Coord>,
    mv: Coord,
) -> bool {
    let mut snake = match VirtualSnake::from_body(body) {
        Some(snake) => snake,
        None => return false,
    };

    if !grid.in_bounds(mv) {
        return false;
    }
    let will_eat = food == Some(mv);
    if snake.contains(mv) && (mv != snake.tail() || will_eat) {
        return false;
    }

    snake.advance(mv, will_eat);
    snake.head_reaches_tail(grid)
}

/// Walks `path` step by step on a virtual snake, then applies the same
/// head-to-tail check as [`simulate_single_move_safe`].
///
/// A leading cell equal to the current head is skipped. Food is consumed at
/// most once: after it is eaten mid-path later steps pop the tail again.
pub fn simulate_path_safe(
    grid: &Grid,
    body: &[Coord],
    food: Option<Coord>,
    path: &[Coord],
) -> bool {
    let mut snake = match VirtualSnake::from_body(body) {
        Some(snake) => snake,
        None => return false,
    };
    let mut food = food;

    let steps = match path.first() {
        Some(&first) if first == snake.head() => &path[1..],
        _ => path,
    };

    for &step in steps {
        if !grid.in_bounds(step) {
            return false;
        }
        if snake.contains(step) && step != snake.tail() {
            return false;
        }
        let will_eat = food == Some(step);
        snake.advance(step, will_eat);
        if will_eat {
            food = None;
        }
    }

    snake.head_reaches_tail(grid)
}

/// The head's neighbours that pass [`simulate_single_move_safe`], in neighbour order
pub fn safe_candidate_moves(grid: &Grid, body: &[Coord], food: Option<Coord>) -> Vec<Coord> {
    let head = match body.first() {
        Some(&head) => head,
        None => return Vec::new(),
    };
    grid.neighbors(head)
        .into_iter()
        .filter(|&mv| simulate_single_move_safe(grid, body, food, mv))
        .collect()
}
