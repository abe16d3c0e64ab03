use crate::find::{MapStorage, MapTrait, NodeReference};
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Point {
    type Err = anyhow::Error;

    /// Parses `row,col`, surrounding whitespace allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Invalid point, expected `row,col`: {}", s))?;

        Ok(Point {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

/// Sum of the absolute differences along both axes
pub fn manhattan(a: Point, b: Point) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// A MapTrait implementation over a binary occupancy matrix.
///
/// A cell value of `0` is passable, anything else is blocked. Rows are not
/// required to have equal length; every lookup is checked against the length
/// of the row it falls in.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridMap {
    pub cells: Vec<Vec<u8>>,
}

impl GridMap {
    /// Create an all-passable grid
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            cells: vec![vec![0; columns]; rows],
        }
    }

    pub fn from_rows(cells: Vec<Vec<u8>>) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Length of the longest row
    pub fn columns(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.cells.get(row).map_or(0, Vec::len)
    }

    pub fn is_rectangular(&self) -> bool {
        let columns = self.row_len(0);
        self.cells.iter().all(|row| row.len() == columns)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.col < self.row_len(point.row)
    }

    pub fn is_passable(&self, point: Point) -> bool {
        self.cells
            .get(point.row)
            .and_then(|row| row.get(point.col))
            .is_some_and(|&value| value == 0)
    }

    /// Mark a cell as blocked or passable. Returns false if the point is outside the grid.
    pub fn set_blocked(&mut self, point: Point, blocked: bool) -> bool {
        match self
            .cells
            .get_mut(point.row)
            .and_then(|row| row.get_mut(point.col))
        {
            Some(cell) => {
                *cell = u8::from(blocked);
                true
            }
            None => false,
        }
    }

    /// Scales the map by the given factor, i.e. to make it twice as large, pass 2.
    /// Interpolates the cells by repeating the existing cells in the new grid.
    pub fn scale_up(&mut self, factor: usize) {
        let mut new_cells = Vec::with_capacity(self.rows() * factor);

        for row in &self.cells {
            let scaled: Vec<u8> = row
                .iter()
                .flat_map(|&cell| std::iter::repeat(cell).take(factor))
                .collect();
            for _ in 0..factor {
                new_cells.push(scaled.clone());
            }
        }

        self.cells = new_cells;
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for &cell in row {
                write!(f, "{}", if cell == 0 { '.' } else { '#' })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Per-cell values for one search, sized to the longest row of the map
#[derive(Debug)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.0.len() && node.col < self.0[node.row].len()
    }

    fn get(&self, node: Self::Reference) -> T {
        self.0[node.row][node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.0[node.row][node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl MapTrait for GridMap {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        self.contains(node)
    }

    fn is_passable(&self, node: Self::Reference) -> bool {
        GridMap::is_passable(self, node)
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        let mut points = Vec::with_capacity(4);

        // up, down, left, right
        if node.row > 0 {
            points.push(Point {
                row: node.row - 1,
                col: node.col,
            });
        }
        points.push(Point {
            row: node.row + 1,
            col: node.col,
        });
        if node.col > 0 {
            points.push(Point {
                row: node.row,
                col: node.col - 1,
            });
        }
        points.push(Point {
            row: node.row,
            col: node.col + 1,
        });

        // filter to only keep passable cells, this also drops anything past the end of a row
        points.retain(|p| GridMap::is_passable(self, *p));

        points.into_iter()
    }

    fn estimate(&self, from: Self::Reference, to: Self::Reference) -> usize {
        manhattan(from, to)
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage(vec![vec![Default::default(); self.columns()]; self.rows()])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!("3,4".parse::<Point>().unwrap(), Point::new(3, 4));
        assert_eq!(" 0 , 12 ".parse::<Point>().unwrap(), Point::new(0, 12));
        assert!("3".parse::<Point>().is_err());
        assert!("a,1".parse::<Point>().is_err());
        assert!("-1,1".parse::<Point>().is_err());
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Point::new(0, 0), Point::new(19, 19)), 38);
        assert_eq!(manhattan(Point::new(5, 1), Point::new(2, 3)), 5);
        assert_eq!(manhattan(Point::new(2, 2), Point::new(2, 2)), 0);
    }

    #[test]
    fn test_non_zero_is_blocked() {
        let map = GridMap::from_rows(vec![vec![0, 1, 2, 255]]);

        assert!(map.is_passable(Point::new(0, 0)));
        assert!(!map.is_passable(Point::new(0, 1)));
        assert!(!map.is_passable(Point::new(0, 2)));
        assert!(!map.is_passable(Point::new(0, 3)));
    }

    #[test]
    fn test_jagged_rows_are_bounds_checked() {
        let map = GridMap::from_rows(vec![vec![0, 0, 0], vec![0], vec![0, 0]]);

        assert!(!map.is_rectangular());
        assert_eq!(map.columns(), 3);
        assert!(map.contains(Point::new(0, 2)));
        assert!(!map.contains(Point::new(1, 1)));
        assert!(!map.is_passable(Point::new(1, 1)));
        assert!(!map.is_passable(Point::new(3, 0)));

        // (0, 1) sits above the short row, so down is not offered
        let neighbors: Vec<Point> = map.neighbors_of(Point::new(0, 1)).collect();
        assert_eq!(neighbors, vec![Point::new(0, 0), Point::new(0, 2)]);
    }

    #[test]
    fn test_neighbor_order() {
        let map = GridMap::new(3, 3);

        let neighbors: Vec<Point> = map.neighbors_of(Point::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(1, 0),
                Point::new(1, 2),
            ]
        );

        let corner: Vec<Point> = map.neighbors_of(Point::new(2, 2)).collect();
        assert_eq!(corner, vec![Point::new(1, 2), Point::new(2, 1)]);
    }

    #[test]
    fn test_neighbors_skip_blocked() {
        let mut map = GridMap::new(3, 3);
        assert!(map.set_blocked(Point::new(0, 1), true));
        assert!(map.set_blocked(Point::new(1, 2), true));
        assert!(!map.set_blocked(Point::new(3, 3), true));

        let neighbors: Vec<Point> = map.neighbors_of(Point::new(1, 1)).collect();
        assert_eq!(neighbors, vec![Point::new(2, 1), Point::new(1, 0)]);
    }

    #[test]
    fn test_storage_covers_longest_row() {
        let map = GridMap::from_rows(vec![vec![0], vec![0, 0, 0, 0]]);
        let storage: CellStorage<u8> = map.create_storage();

        assert!(storage.is_valid(Point::new(0, 3)));
        assert!(storage.is_valid(Point::new(1, 3)));
        assert!(!storage.is_valid(Point::new(2, 0)));
    }

    #[test]
    fn test_scale_up() {
        let mut map = GridMap::from_rows(vec![vec![0, 1], vec![1, 0]]);
        map.scale_up(2);

        assert_eq!(
            map.cells,
            vec![
                vec![0, 0, 1, 1],
                vec![0, 0, 1, 1],
                vec![1, 1, 0, 0],
                vec![1, 1, 0, 0],
            ]
        );
    }

    #[test]
    fn test_display() {
        let map = GridMap::from_rows(vec![vec![0, 1, 0], vec![1, 0, 0]]);
        assert_eq!(map.to_string(), ".#.\n#..\n");
    }

    #[test]
    fn test_json_is_plain_matrix() {
        let map: GridMap = serde_json::from_str("[[0,1],[0,0]]").unwrap();
        assert_eq!(map, GridMap::from_rows(vec![vec![0, 1], vec![0, 0]]));
        assert_eq!(serde_json::to_string(&map).unwrap(), "[[0,1],[0,0]]");
    }
}
