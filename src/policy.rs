// Decision policy: picks exactly one move per tick
//
// Tiers are evaluated in strict priority order and the first one that
// produces a move wins:
//   1. finisher           - eat adjacent food on a nearly full board
//   2. starvation gate    - no move, relaxes later tie-breaks
//   3. stuck detection    - no move, updates counters
//   4. unlock food        - food sealed off from the tail: spread out
//   5. food pursuit       - BFS to food if the arrival keeps an escape route
//   6. tail circulation   - best safe neighbour
//   7. fallback           - any in-bounds neighbour, position is likely lost
//
// The policy never mutates the snake or the food; the only state it writes is
// the PolicyState bookkeeping passed in by the caller, once per real tick.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::config::PolicyConfig;
use crate::grid::Grid;
use crate::search::{connected, shortest_path};
use crate::simulate::{safe_candidate_moves, simulate_path_safe};
use crate::types::Coord;

/// Per-session bookkeeping carried across ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    /// Starvation clock: ticks since the score last changed
    pub moves_since_eat: u64,
    pub prev_score: u32,
    /// Stuck detector: score, food and distance seen on the previous tick
    pub last_score: u32,
    pub last_food: Option<Coord>,
    pub last_dist: i32,
    pub stuck_counter: u32,
    /// Toggled to alternate between the top two candidates
    pub jitter_phase: bool,
}

impl PolicyState {
    /// State for a freshly started session
    pub fn new(head: Coord, food: Option<Coord>, score: u32) -> Self {
        PolicyState {
            moves_since_eat: 0,
            prev_score: score,
            last_score: 0,
            last_food: food,
            last_dist: head.manhattan_to(food),
            stuck_counter: 0,
            jitter_phase: false,
        }
    }
}

/// Which tier produced the decision. Observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    WinningMove,
    SmartFinish,
    UnlockFoodViaTail,
    ShortestToFood,
    ShortestToFoodStarving,
    ToTailSafe,
    EndgameCirculate,
    FallbackSafeNeighbor,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::WinningMove => "WINNING_MOVE",
            Status::SmartFinish => "SMART_FINISH",
            Status::UnlockFoodViaTail => "unlock_food_via_tail",
            Status::ShortestToFood => "shortest_to_food",
            Status::ShortestToFoodStarving => "shortest_to_food (STARVING)",
            Status::ToTailSafe => "to_tail_safe",
            Status::EndgameCirculate => "endgame_circulate",
            Status::FallbackSafeNeighbor => "fallback_safe_neighbor",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The move chosen for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub next: Coord,
    pub status: Status,
}

/// Read-only view of the game state for one tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// Snake body, head first
    pub body: &'a [Coord],
    pub food: Option<Coord>,
    pub score: u32,
}

/// Orders candidates farther-from-food first, then farther-from-tail.
fn farther_from_food_then_tail(a: &Coord, b: &Coord, food: Coord, tail: Coord) -> Ordering {
    b.manhattan(food)
        .cmp(&a.manhattan(food))
        .then_with(|| b.manhattan(tail).cmp(&a.manhattan(tail)))
}

/// Tail-circulation order: farther-from-tail first; ties go to the candidate
/// farther from food, or nearer to food while starving.
///
/// This is a heuristic kept exactly as tuned, not a proven-safe rule.
fn circulation_order(a: &Coord, b: &Coord, food: Coord, tail: Coord, starving: bool) -> Ordering {
    let by_tail = b.manhattan(tail).cmp(&a.manhattan(tail));
    let by_food = if starving {
        a.manhattan(food).cmp(&b.manhattan(food))
    } else {
        b.manhattan(food).cmp(&a.manhattan(food))
    };
    by_tail.then(by_food)
}

/// Top candidate, or the runner-up when `alternate` is set and one exists
fn pick(ranked: &[Coord], alternate: bool) -> Coord {
    if alternate && ranked.len() >= 2 {
        ranked[1]
    } else {
        ranked[0]
    }
}

/// Layered move-selection policy for one board
#[derive(Debug, Clone)]
pub struct Policy {
    grid: Grid,
    tuning: PolicyConfig,
}

impl Policy {
    pub fn new(grid: Grid, tuning: PolicyConfig) -> Self {
        Policy { grid, tuning }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cycles of the stuck detector tolerated before jitter kicks in
    pub fn stuck_limit(&self) -> u32 {
        (self.grid.cols + self.grid.rows).max(0) as u32
    }

    /// Decides the next head position for this tick
    ///
    /// Updates the starvation clock and (unless the finisher fires) the stuck
    /// detector in `state`. Must be called exactly once per real tick.
    ///
    /// # Returns
    /// * `None` only for an empty body
    /// * otherwise a 4-neighbour of the head; the head itself only on a 1x1 board
    pub fn decide(&self, state: &mut PolicyState, input: &TickInput) -> Option<Decision> {
        let head = *input.body.first()?;
        let tail = *input.body.last()?;
        let occupied: HashSet<Coord> = input.body.iter().copied().collect();
        let total_cells = self.grid.cell_count().max(1);

        let starving = self.tick_starvation_clock(state, input.score, total_cells);

        if let Some(decision) = self.finisher(head, &occupied, input, total_cells) {
            return Some(decision);
        }

        self.track_stuck(state, head, input);
        let stuck_limit = self.stuck_limit();

        if let Some(decision) = self.unlock_food(state, input, &occupied, tail, stuck_limit) {
            return Some(decision);
        }

        let fill_ratio = input.body.len() as f64 / total_cells as f64;
        let endgame = fill_ratio > self.tuning.endgame_fill_ratio && !starving;

        if !endgame {
            if let Some(decision) = self.pursue_food(head, &occupied, input, starving) {
                return Some(decision);
            }
        }

        if let Some(decision) = self.circulate(state, input, head, tail, starving, endgame) {
            return Some(decision);
        }

        Some(self.fallback(state, input, head, tail))
    }

    /// Advances or resets the starvation clock; returns whether the agent is starving
    fn tick_starvation_clock(&self, state: &mut PolicyState, score: u32, total_cells: usize) -> bool {
        if score != state.prev_score {
            state.moves_since_eat = 0;
            state.prev_score = score;
        } else {
            state.moves_since_eat += 1;
        }
        state.moves_since_eat > self.tuning.starvation_factor * total_cells as u64
    }

    fn finisher(
        &self,
        head: Coord,
        occupied: &HashSet<Coord>,
        input: &TickInput,
        total_cells: usize,
    ) -> Option<Decision> {
        let empty_cells = total_cells.saturating_sub(input.body.len());
        let nearly_full = empty_cells <= self.tuning.finisher_empty_cells
            || (total_cells < self.tuning.small_board_cells
                && empty_cells <= self.tuning.small_board_finisher_empty_cells);
        if !nearly_full {
            return None;
        }

        let food = input.food?;
        if occupied.contains(&food) || !self.grid.neighbors(head).contains(&food) {
            return None;
        }

        if empty_cells == 1 {
            return Some(Decision {
                next: food,
                status: Status::WinningMove,
            });
        }

        // after eating the whole old body stays, tail included
        let open_after_eating = self
            .grid
            .neighbors(food)
            .into_iter()
            .filter(|c| !occupied.contains(c))
            .count();
        if open_after_eating > 0 {
            Some(Decision {
                next: food,
                status: Status::SmartFinish,
            })
        } else {
            None
        }
    }

    fn track_stuck(&self, state: &mut PolicyState, head: Coord, input: &TickInput) {
        let dist = head.manhattan_to(input.food);
        if input.score == state.last_score && input.food == state.last_food {
            if dist >= state.last_dist {
                state.stuck_counter += 1;
            } else {
                state.stuck_counter = state.stuck_counter.saturating_sub(1);
            }
        } else {
            state.stuck_counter = 0;
            state.last_score = input.score;
            state.last_food = input.food;
        }
        state.last_dist = dist;
    }

    /// Food sealed off from the tail: move away from both to break the lock
    fn unlock_food(
        &self,
        state: &mut PolicyState,
        input: &TickInput,
        occupied: &HashSet<Coord>,
        tail: Coord,
        stuck_limit: u32,
    ) -> Option<Decision> {
        let food = input.food?;
        let mut blocked = occupied.clone();
        blocked.remove(&tail);
        if connected(&self.grid, food, tail, &blocked) {
            return None;
        }

        let mut safe = safe_candidate_moves(&self.grid, input.body, input.food);
        if safe.is_empty() {
            return None;
        }

        if state.stuck_counter > stuck_limit {
            state.jitter_phase = !state.jitter_phase;
            state.stuck_counter = 0;
        }

        safe.sort_by(|a, b| farther_from_food_then_tail(a, b, food, tail));
        Some(Decision {
            next: pick(&safe, state.jitter_phase),
            status: Status::UnlockFoodViaTail,
        })
    }

    fn pursue_food(
        &self,
        head: Coord,
        occupied: &HashSet<Coord>,
        input: &TickInput,
        starving: bool,
    ) -> Option<Decision> {
        let path = shortest_path(&self.grid, head, input.food, occupied)?;
        if !simulate_path_safe(&self.grid, input.body, input.food, &path) {
            return None;
        }
        let next = *path.get(1)?;
        Some(Decision {
            next,
            status: if starving {
                Status::ShortestToFoodStarving
            } else {
                Status::ShortestToFood
            },
        })
    }

    fn circulate(
        &self,
        state: &PolicyState,
        input: &TickInput,
        head: Coord,
        tail: Coord,
        starving: bool,
        endgame: bool,
    ) -> Option<Decision> {
        let mut safe = safe_candidate_moves(&self.grid, input.body, input.food);
        if safe.is_empty() {
            return None;
        }

        let target = input.food.unwrap_or(head);
        safe.sort_by(|a, b| circulation_order(a, b, target, tail, starving));

        let restless = starving || state.stuck_counter > self.stuck_limit();
        let alternate = restless && state.moves_since_eat % 2 == 1;
        Some(Decision {
            next: pick(&safe, alternate),
            status: if endgame {
                Status::EndgameCirculate
            } else {
                Status::ToTailSafe
            },
        })
    }

    /// No safe candidate: any in-bounds neighbour, far from food and tail
    fn fallback(&self, state: &PolicyState, input: &TickInput, head: Coord, tail: Coord) -> Decision {
        let mut candidates = self.grid.neighbors(head);
        if candidates.is_empty() {
            return Decision {
                next: head,
                status: Status::FallbackSafeNeighbor,
            };
        }

        let target = input.food.unwrap_or(head);
        candidates.sort_by(|a, b| farther_from_food_then_tail(a, b, target, tail));
        Decision {
            next: pick(&candidates, state.jitter_phase),
            status: Status::FallbackSafeNeighbor,
        }
    }
}
