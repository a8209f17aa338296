// Breadth-first shortest-path search on the 4-neighbourhood grid graph
//
// O(cols * rows) per call: each cell is discovered at most once and the
// parent links live in a dense buffer indexed by cell.

use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::types::Coord;

/// Shortest path from `start` to `goal` avoiding `blocked`, both ends inclusive.
///
/// Ties between equally short paths are broken by neighbour enumeration order
/// (first discovered wins). `start` itself is never tested against `blocked`.
///
/// # Returns
/// * `Some(vec![start])` when `goal == start`
/// * `None` when `goal` is absent, out of bounds, blocked, or unreachable
pub fn shortest_path(
    grid: &Grid,
    start: Coord,
    goal: Option<Coord>,
    blocked: &HashSet<Coord>,
) -> Option<Vec<Coord>> {
    let goal = goal?;
    if start == goal {
        return Some(vec![start]);
    }
    let start_idx = grid.index_of(start)?;
    grid.index_of(goal)?;

    let mut parent: Vec<Option<Coord>> = vec![None; grid.cell_count()];
    let mut visited = vec![false; grid.cell_count()];
    visited[start_idx] = true;

    let mut frontier = VecDeque::new();
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        for next in grid.neighbors(current) {
            if blocked.contains(&next) {
                continue;
            }
            let idx = match grid.index_of(next) {
                Some(idx) => idx,
                None => continue,
            };
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            parent[idx] = Some(current);

            if next == goal {
                return Some(rebuild_path(grid, &parent, start, goal));
            }
            frontier.push_back(next);
        }
    }

    None
}

/// True iff a path from `a` to `b` exists avoiding `blocked`
pub fn connected(grid: &Grid, a: Coord, b: Coord, blocked: &HashSet<Coord>) -> bool {
    shortest_path(grid, a, Some(b), blocked).is_some()
}

fn rebuild_path(grid: &Grid, parent: &[Option<Coord>], start: Coord, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match grid.index_of(cursor).and_then(|idx| parent[idx]) {
            Some(prev) => {
                path.push(prev);
                cursor = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked(cells: &[(i32, i32)]) -> HashSet<Coord> {
        cells.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = Grid::new(4, 4);
        let c = Coord::new(2, 2);
        assert_eq!(shortest_path(&grid, c, Some(c), &HashSet::new()), Some(vec![c]));
    }

    #[test]
    fn test_absent_goal_has_no_path() {
        let grid = Grid::new(4, 4);
        assert_eq!(
            shortest_path(&grid, Coord::new(0, 0), None, &HashSet::new()),
            None
        );
    }

    #[test]
    fn test_out_of_bounds_goal_has_no_path() {
        let grid = Grid::new(4, 4);
        assert!(!connected(&grid, Coord::new(0, 0), Coord::new(4, 0), &HashSet::new()));
        assert!(!connected(&grid, Coord::new(0, 0), Coord::new(0, -1), &HashSet::new()));
    }

    #[test]
    fn test_straight_line_prefers_plus_x() {
        let grid = Grid::new(10, 10);
        let path = shortest_path(&grid, Coord::new(2, 2), Some(Coord::new(4, 4)), &HashSet::new())
            .expect("open board must have a path");
        assert_eq!(path.len(), 5);
        // +x is enumerated first, so the x leg is walked before the y leg
        assert_eq!(path[1], Coord::new(3, 2));
        assert_eq!(path[2], Coord::new(4, 2));
        assert_eq!(path[4], Coord::new(4, 4));
    }

    #[test]
    fn test_detour_around_wall() {
        let grid = Grid::new(5, 5);
        // vertical wall at x=2 with a gap at y=4
        let wall = blocked(&[(2, 0), (2, 1), (2, 2), (2, 3)]);
        let path = shortest_path(&grid, Coord::new(0, 0), Some(Coord::new(4, 0)), &wall)
            .expect("gap must be found");
        assert_eq!(path.first(), Some(&Coord::new(0, 0)));
        assert_eq!(path.last(), Some(&Coord::new(4, 0)));
        assert_eq!(path.len(), 13);
        assert!(path.iter().all(|c| !wall.contains(c)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn test_sealed_goal_is_unreachable() {
        let grid = Grid::new(5, 5);
        let ring = blocked(&[(1, 0), (0, 1)]);
        assert!(!connected(&grid, Coord::new(3, 3), Coord::new(0, 0), &ring));
        assert!(!connected(&grid, Coord::new(0, 0), Coord::new(3, 3), &ring));
    }

    #[test]
    fn test_blocked_goal_is_unreachable() {
        let grid = Grid::new(5, 5);
        let goal = Coord::new(2, 2);
        assert!(!connected(&grid, Coord::new(0, 0), goal, &blocked(&[(2, 2)])));
    }

    #[test]
    fn test_blocked_start_still_expands() {
        let grid = Grid::new(3, 1);
        let b = blocked(&[(0, 0)]);
        assert!(connected(&grid, Coord::new(0, 0), Coord::new(2, 0), &b));
    }
}
