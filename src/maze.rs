use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt::Display,
};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    // Search order, ties between equally short paths go to the earlier direction.
    pub fn all_dirs() -> &'static [Direction] {
        static ALL_DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        &ALL_DIRECTIONS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn row(&self) -> usize {
        self.r
    }

    pub fn col(&self) -> usize {
        self.c
    }

    /// Neighbor one step towards `dir`, `None` if it would leave the first row or column.
    /// Neighbors past the last row or column are returned, callers check them against the grid.
    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        match dir {
            Direction::Up if self.r > 0 => Some(Self::new(self.r - 1, self.c)),
            Direction::Down => Some(Self::new(self.r + 1, self.c)),
            Direction::Left if self.c > 0 => Some(Self::new(self.r, self.c - 1)),
            Direction::Right => Some(Self::new(self.r, self.c + 1)),
            _ => None,
        }
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.r.abs_diff(other.r) + self.c.abs_diff(other.c) == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open(i64),
}

impl From<i64> for Tile {
    fn from(value: i64) -> Self {
        if value == 0 {
            Tile::Wall
        } else {
            Tile::Open(value)
        }
    }
}

impl Tile {
    pub fn can_pass(&self) -> bool {
        matches!(self, Tile::Open(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
}

impl Grid {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn tile(&self, pos: &Position) -> Option<&Tile> {
        self.pos_to_ind(pos).and_then(|ind| self.tiles.get(ind))
    }

    pub fn is_inside(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }

    pub fn can_pass(&self, pos: &Position) -> bool {
        self.tile(pos).is_some_and(|tile| tile.can_pass())
    }

    /// Breadth-first search from `from` to `to` over passable tiles, moving in the
    /// four directions of [`Direction::all_dirs`].
    ///
    /// The returned path starts with `from` and ends with `to`. The start tile itself
    /// isn't required to be passable, every tile entered by a step is.
    pub fn shortest_path(&self, from: &Position, to: &Position) -> Result<Vec<Position>, Error> {
        if !self.is_inside(from) || !self.is_inside(to) {
            return Err(Error::NoPath(*from, *to));
        }

        let mut search_positions = VecDeque::from([*from]);
        let mut searched_positions = HashSet::from([*from]);
        let mut src_positions: HashMap<Position, Position> = HashMap::new();
        while let Some(cur_pos) = search_positions.pop_front() {
            if cur_pos == *to {
                log::debug!(
                    "Reached {} after searching {} position(s).",
                    to,
                    searched_positions.len()
                );
                return Ok(Self::backtrack(&src_positions, from, to));
            }

            for next_pos in Direction::all_dirs()
                .iter()
                .flat_map(|dir| cur_pos.neighbor(*dir))
                .filter(|pos| self.can_pass(pos))
            {
                if searched_positions.insert(next_pos) {
                    src_positions.insert(next_pos, cur_pos);
                    search_positions.push_back(next_pos);
                }
            }
        }

        log::debug!(
            "Exhausted {} reachable position(s) without reaching {}.",
            searched_positions.len(),
            to
        );
        Err(Error::NoPath(*from, *to))
    }

    fn backtrack(
        src_positions: &HashMap<Position, Position>,
        from: &Position,
        to: &Position,
    ) -> Vec<Position> {
        let mut path = vec![*to];
        let mut cur_pos = *to;
        while cur_pos != *from {
            match src_positions.get(&cur_pos) {
                Some(src_pos) => {
                    path.push(*src_pos);
                    cur_pos = *src_pos;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }

    fn pos_to_ind(&self, pos: &Position) -> Option<usize> {
        if self.is_inside(pos) {
            Some(pos.r * self.col_n + pos.c)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct GridBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
    added_row_n: usize,
}

impl GridBuilder {
    pub fn new(row_n: usize, col_n: usize) -> Self {
        Self {
            tiles: Vec::new(),
            row_n,
            col_n,
            added_row_n: 0,
        }
    }

    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let values = text
            .split_whitespace()
            .map(|s| {
                s.parse::<i64>()
                    .map_err(|_| Error::InvalidCellValue(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != self.col_n {
            return Err(Error::InconsistentRow(
                self.added_row_n,
                self.col_n,
                values.len(),
            ));
        }

        self.tiles.extend(values.into_iter().map(Tile::from));
        self.added_row_n += 1;
        Ok(())
    }

    pub fn build(self) -> Result<Grid, Error> {
        if self.added_row_n != self.row_n {
            return Err(Error::MissingRows(self.row_n, self.added_row_n));
        }

        Ok(Grid {
            tiles: self.tiles,
            row_n: self.row_n,
            col_n: self.col_n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let col_n = rows
            .first()
            .map(|row| row.split_whitespace().count())
            .unwrap_or(0);
        let mut builder = GridBuilder::new(rows.len(), col_n);
        for row in rows {
            builder.add_row(row).unwrap();
        }

        builder.build().unwrap()
    }

    #[test]
    fn zero_is_wall_and_anything_else_is_open() {
        assert_eq!(Tile::from(0), Tile::Wall);
        assert_eq!(Tile::from(7), Tile::Open(7));
        assert!(Tile::from(-1).can_pass());
        assert!(!Tile::from(0).can_pass());
    }

    #[test]
    fn neighbors_stop_at_first_row_and_column() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.neighbor(Direction::Up), None);
        assert_eq!(pos.neighbor(Direction::Left), None);
        assert_eq!(pos.neighbor(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(pos.neighbor(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn prefers_down_over_right_on_open_square() {
        let grid = grid_from(&["1 1", "1 1"]);

        let path = grid
            .shortest_path(&Position::new(0, 0), &Position::new(1, 1))
            .unwrap();

        assert_eq!(
            path,
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn same_start_and_end_is_single_position() {
        let grid = grid_from(&["1 0", "0 1"]);

        let path = grid
            .shortest_path(&Position::new(1, 1), &Position::new(1, 1))
            .unwrap();

        assert_eq!(path, vec![Position::new(1, 1)]);
    }

    #[test]
    fn walks_around_walls() {
        let grid = grid_from(&[
            "1 1 1 1", //
            "0 0 0 1", //
            "1 1 1 1", //
            "1 0 0 0", //
        ]);

        let path = grid
            .shortest_path(&Position::new(0, 0), &Position::new(3, 0))
            .unwrap();

        assert_eq!(path.len(), 10);
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(3, 0)));
        assert!(path.windows(2).all(|w| w[0].is_adjacent(&w[1])));
        assert!(path[1..].iter().all(|pos| grid.can_pass(pos)));
    }

    #[test]
    fn walled_off_end_has_no_path() {
        let grid = grid_from(&["1 0 1", "1 0 1", "1 0 1"]);

        let result = grid.shortest_path(&Position::new(0, 0), &Position::new(2, 2));

        assert!(matches!(result, Err(Error::NoPath(_, _))));
    }

    #[test]
    fn wall_at_end_has_no_path() {
        let grid = grid_from(&["1 1", "1 0"]);

        let result = grid.shortest_path(&Position::new(0, 0), &Position::new(1, 1));

        assert!(matches!(result, Err(Error::NoPath(_, _))));
    }

    #[test]
    fn wall_at_start_is_left_anyway() {
        let grid = grid_from(&["0 1", "1 1"]);

        let path = grid
            .shortest_path(&Position::new(0, 0), &Position::new(1, 1))
            .unwrap();

        assert_eq!(path.len(), 3);
    }

    #[test]
    fn outside_positions_have_no_path() {
        let grid = grid_from(&["1 1", "1 1"]);

        let result = grid.shortest_path(&Position::new(0, 0), &Position::new(2, 0));

        assert!(matches!(result, Err(Error::NoPath(_, _))));
    }

    #[test]
    fn builder_rejects_wrong_column_count() {
        let mut builder = GridBuilder::new(2, 3);
        builder.add_row("1 1 1").unwrap();

        let result = builder.add_row("1 1");

        assert!(matches!(result, Err(Error::InconsistentRow(1, 3, 2))));
    }

    #[test]
    fn builder_rejects_non_integer_cell() {
        let mut builder = GridBuilder::new(1, 2);

        let result = builder.add_row("1 x");

        assert!(matches!(result, Err(Error::InvalidCellValue(s)) if s == "x"));
    }

    #[test]
    fn builder_rejects_missing_rows() {
        let mut builder = GridBuilder::new(3, 1);
        builder.add_row("1").unwrap();

        assert!(matches!(builder.build(), Err(Error::MissingRows(3, 1))));
    }
}
