//! Shortest paths through grid mazes.
//!
//! [`PathFinder`] runs an A* search with a Manhattan distance estimate over
//! anything implementing [`MapTrait`], one finalized node per step.
//! [`GridMap`] is the occupancy grid it is normally used with, and
//! [`solve`] / [`try_solve`] wrap the whole search into a single call.
//! The [`maze`] module reads and renders labeled text mazes and defines the
//! JSON messages for solving over a request/response or streaming channel.

pub mod find;
pub mod grid;
pub mod maze;
mod solve;
pub mod util;

pub use find::{
    MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult, Visited,
    VisitedItem,
};
pub use grid::{manhattan, CellStorage, GridMap, Point};
pub use maze::{stream_solve, Maze, MazeError, SolveEvent, SolveRequest, SolveResponse};
pub use solve::{check_bounds, solve, solve_with, try_solve, SolveError};
