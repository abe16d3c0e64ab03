use thiserror::Error;

use crate::find::{PathFinder, PathFinderState};
use crate::grid::{GridMap, Point};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("grid has no cells")]
    EmptyGrid,
    #[error("start {0} lies outside the grid")]
    StartOutOfBounds(Point),
    #[error("goal {0} lies outside the grid")]
    GoalOutOfBounds(Point),
}

/// Shortest orthogonal path from `start` to `goal`, both inclusive.
///
/// Returns `None` when the goal cannot be reached, including when either end
/// is blocked or lies outside the grid.
pub fn solve(grid: &GridMap, start: Point, goal: Point) -> Option<Vec<Point>> {
    solve_with(grid, start, goal, |_| {})
}

/// Like [`solve`], calling `on_visit` once for every cell the search
/// finalizes, in the order they are finalized.
pub fn solve_with(
    grid: &GridMap,
    start: Point,
    goal: Point,
    on_visit: impl FnMut(Point),
) -> Option<Vec<Point>> {
    match PathFinder::new(grid, start, goal).finish(grid, on_visit).0 {
        PathFinderState::PathFound(result) => Some(result.path),
        _ => None,
    }
}

/// Checked variant of [`solve_with`] that rejects coordinates outside the
/// grid instead of reporting them as unreachable.
pub fn try_solve(
    grid: &GridMap,
    start: Point,
    goal: Point,
    on_visit: impl FnMut(Point),
) -> Result<Option<Vec<Point>>, SolveError> {
    check_bounds(grid, start, goal)?;
    Ok(solve_with(grid, start, goal, on_visit))
}

/// Both ends must lie inside the grid. Blocked ends are fine, they are simply unreachable.
pub fn check_bounds(grid: &GridMap, start: Point, goal: Point) -> Result<(), SolveError> {
    if grid.rows() == 0 || grid.columns() == 0 {
        return Err(SolveError::EmptyGrid);
    }
    if !grid.contains(start) {
        return Err(SolveError::StartOutOfBounds(start));
    }
    if !grid.contains(goal) {
        return Err(SolveError::GoalOutOfBounds(goal));
    }
    Ok(())
}
