//! Labeled mazes and the messages used to ask for and report a solve.
//!
//! The text format has one line per grid row:
//!
//! ```text
//! S..#
//! .#.#
//! ...G
//! ```
//!
//! `#` is a wall, `.` or a space is open floor, `S` and `G` mark the start and
//! the goal, and `*` is a path marker from an earlier render (read as floor).

use std::{collections::HashSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{GridMap, Point};
use crate::solve::{try_solve, SolveError};

const WALL: char = '#';
const FLOOR: char = '.';
const START: char = 'S';
const GOAL: char = 'G';
const PATH: char = '*';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze is empty")]
    Empty,
    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    UnexpectedChar {
        ch: char,
        line: usize,
        column: usize,
    },
    #[error("maze has no start marker 'S'")]
    MissingStart,
    #[error("maze has no goal marker 'G'")]
    MissingGoal,
    #[error("second start marker at line {line}, column {column}")]
    DuplicateStart { line: usize, column: usize },
    #[error("second goal marker at line {line}, column {column}")]
    DuplicateGoal { line: usize, column: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    pub grid: GridMap,
    pub start: Point,
    pub goal: Point,
}

impl Maze {
    /// Render the maze with `*` on every cell of `path` other than its ends
    pub fn render(&self, path: Option<&[Point]>) -> String {
        let on_path: HashSet<Point> = path.unwrap_or_default().iter().copied().collect();

        let mut out = String::new();
        for (row, cells) in self.grid.cells.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                let point = Point { row, col };
                out.push(if point == self.start {
                    START
                } else if point == self.goal {
                    GOAL
                } else if cell != 0 {
                    WALL
                } else if on_path.contains(&point) {
                    PATH
                } else {
                    FLOOR
                });
            }
            out.push('\n');
        }
        out
    }
}

impl Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(None))
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().collect();
        let used = lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .ok_or(MazeError::Empty)?;

        let mut cells = Vec::with_capacity(used + 1);
        let mut start = None;
        let mut goal = None;

        for (row, text) in lines[..=used].iter().enumerate() {
            let mut cells_row = Vec::with_capacity(text.len());
            for (col, ch) in text.trim_end_matches('\r').chars().enumerate() {
                let (line, column) = (row + 1, col + 1);
                let blocked = match ch {
                    WALL => true,
                    FLOOR | ' ' | PATH => false,
                    START => {
                        if start.replace(Point { row, col }).is_some() {
                            return Err(MazeError::DuplicateStart { line, column });
                        }
                        false
                    }
                    GOAL => {
                        if goal.replace(Point { row, col }).is_some() {
                            return Err(MazeError::DuplicateGoal { line, column });
                        }
                        false
                    }
                    ch => return Err(MazeError::UnexpectedChar { ch, line, column }),
                };
                cells_row.push(u8::from(blocked));
            }
            cells.push(cells_row);
        }

        Ok(Maze {
            grid: GridMap::from_rows(cells),
            start: start.ok_or(MazeError::MissingStart)?,
            goal: goal.ok_or(MazeError::MissingGoal)?,
        })
    }
}

/// A request to solve `grid` from `start` to `goal`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub grid: GridMap,
    pub start: Point,
    pub goal: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// `None` when the goal cannot be reached
    pub path: Option<Vec<Point>>,
    /// Number of cells finalized by the search
    pub visited: usize,
}

/// Progress of a streamed solve: one `Visit` per finalized cell in order,
/// then a single `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolveEvent {
    Visit { point: Point },
    Result { path: Option<Vec<Point>> },
}

impl From<Maze> for SolveRequest {
    fn from(maze: Maze) -> Self {
        SolveRequest {
            grid: maze.grid,
            start: maze.start,
            goal: maze.goal,
        }
    }
}

impl SolveRequest {
    pub fn solve(&self) -> Result<SolveResponse, SolveError> {
        stream_solve(self, |_| {})
    }
}

/// Solve `request`, handing every event to `sink` as soon as it happens.
///
/// Invalid coordinates are reported before any event is produced.
pub fn stream_solve(
    request: &SolveRequest,
    mut sink: impl FnMut(SolveEvent),
) -> Result<SolveResponse, SolveError> {
    let mut visited = 0;
    let path = try_solve(&request.grid, request.start, request.goal, |point| {
        visited += 1;
        sink(SolveEvent::Visit { point });
    })?;

    sink(SolveEvent::Result { path: path.clone() });

    Ok(SolveResponse { path, visited })
}
