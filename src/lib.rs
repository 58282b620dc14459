use std::{
    error,
    fmt::Display,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

pub mod maze;

pub use maze::{Direction, Grid, GridBuilder, Position, Tile};

#[derive(Debug)]
pub enum Error {
    MissingDimensions,
    InvalidDimensionsCount(usize),
    InvalidDimension(&'static str, String), // (name of dimension, given text)
    MissingRows(usize, usize),              // (expected row count, given row count)
    InconsistentRow(usize, usize, usize),   // (row index, expected column count, given column count)
    InvalidCellValue(String),
    MissingCoordinates,
    InvalidCoordinatesCount(usize),
    InvalidCoordinate(&'static str, String), // (name of coordinate, given text)
    CoordinateOutOfBounds(&'static str, i64, i64, usize, usize), // (name of position, row, column, row count, column count)
    NoPath(Position, Position),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingDimensions => write!(f, "No dimensions of maze in given input."),
            Error::InvalidDimensionsCount(n) => write!(
                f,
                "Expect 2 dimensions(rows, columns) of maze, given {}.",
                n
            ),
            Error::InvalidDimension(name, s) => {
                write!(f, "Invalid text({}) for {} of maze.", s, name)
            }
            Error::MissingRows(expect_row_n, row_n) => write!(
                f,
                "Expect {} row(s) in maze, given {}.",
                expect_row_n, row_n
            ),
            Error::InconsistentRow(row_ind, expect_col_n, col_n) => write!(
                f,
                "Expect {} column(s) in row {}, given {}.",
                expect_col_n, row_ind, col_n
            ),
            Error::InvalidCellValue(s) => write!(f, "Invalid text({}) for cell of maze.", s),
            Error::MissingCoordinates => {
                write!(f, "No start and end coordinates in given input.")
            }
            Error::InvalidCoordinatesCount(n) => write!(
                f,
                "Expect 4 coordinates(start row, start column, end row, end column), given {}.",
                n
            ),
            Error::InvalidCoordinate(name, s) => write!(f, "Invalid text({}) for {}.", s, name),
            Error::CoordinateOutOfBounds(name, r, c, row_n, col_n) => write!(
                f,
                "The {} position({}, {}) is outside of maze with {} row(s) and {} column(s).",
                name, r, c, row_n, col_n
            ),
            Error::NoPath(from, to) => write!(f, "There's no path from {} to {}.", from, to),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
#[command(version, about = "Find the shortest path through a grid maze.")]
pub struct CLIArgs {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    start: Position,
    end: Position,
}

impl Maze {
    pub fn new(grid: Grid, start: Position, end: Position) -> Self {
        Self { grid, start, end }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn shortest_path(&self) -> Result<Vec<Position>, Error> {
        self.grid.shortest_path(&self.start, &self.end)
    }
}

pub fn read_maze<P: AsRef<Path>>(path: P) -> Result<Maze> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    parse_maze(BufReader::new(file))
        .with_context(|| format!("Failed to parse given file({}).", path.as_ref().display()))
}

/// Parses a maze in the form of
///
/// ```text
/// <rows> <columns>
/// <columns cell values>   (rows lines)
/// <start row> <start column> <end row> <end column>
/// ```
///
/// Cell value 0 is a wall, any other integer is passable. Lines after the coordinates are ignored.
pub fn parse_maze<R: BufRead>(reader: R) -> Result<Maze> {
    let mut lines = reader.lines().enumerate();

    let dims_text = next_line(&mut lines)?.ok_or(Error::MissingDimensions)?;
    let (row_n, col_n) = parse_dimensions(&dims_text)?;
    log::debug!("Maze has {} row(s) and {} column(s).", row_n, col_n);

    let mut builder = GridBuilder::new(row_n, col_n);
    for row_ind in 0..row_n {
        let Some(row_text) = next_line(&mut lines)? else {
            return Err(Error::MissingRows(row_n, row_ind).into());
        };
        builder.add_row(&row_text)?;
    }
    let grid = builder.build()?;

    let coords_text = next_line(&mut lines)?.ok_or(Error::MissingCoordinates)?;
    let (start, end) = parse_endpoints(&coords_text, &grid)?;
    log::debug!("Searching path from {} to {}.", start, end);

    Ok(Maze::new(grid, start, end))
}

fn next_line<I>(lines: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = (usize, io::Result<String>)>,
{
    lines
        .next()
        .map(|(ind, line)| line.with_context(|| format!("Failed to read line {}.", ind + 1)))
        .transpose()
}

fn parse_dimensions(text: &str) -> Result<(usize, usize), Error> {
    let tokens = text.split_whitespace().collect::<Vec<_>>();
    if tokens.len() != 2 {
        return Err(Error::InvalidDimensionsCount(tokens.len()));
    }

    let parse = |name: &'static str, s: &str| {
        s.parse::<usize>()
            .map_err(|_| Error::InvalidDimension(name, s.to_string()))
    };
    Ok((parse("rows", tokens[0])?, parse("columns", tokens[1])?))
}

fn parse_endpoints(text: &str, grid: &Grid) -> Result<(Position, Position), Error> {
    let tokens = text.split_whitespace().collect::<Vec<_>>();
    if tokens.len() != 4 {
        return Err(Error::InvalidCoordinatesCount(tokens.len()));
    }

    const COORD_NAMES: [&str; 4] = ["start row", "start column", "end row", "end column"];
    let mut coords = [0i64; 4];
    for (coord, (name, s)) in coords.iter_mut().zip(COORD_NAMES.iter().zip(tokens)) {
        *coord = s
            .parse::<i64>()
            .map_err(|_| Error::InvalidCoordinate(*name, s.to_string()))?;
    }

    let start = position_in(grid, "start", coords[0], coords[1])?;
    let end = position_in(grid, "end", coords[2], coords[3])?;
    Ok((start, end))
}

fn position_in(grid: &Grid, name: &'static str, r: i64, c: i64) -> Result<Position, Error> {
    let out_of_bounds = || Error::CoordinateOutOfBounds(name, r, c, grid.row_n(), grid.col_n());
    let r = usize::try_from(r).map_err(|_| out_of_bounds())?;
    let c = usize::try_from(c).map_err(|_| out_of_bounds())?;
    let pos = Position::new(r, c);
    if grid.is_inside(&pos) {
        Ok(pos)
    } else {
        Err(out_of_bounds())
    }
}

/// Writes one `<row> <column>` line per position, then a line with a single `.`.
pub fn format_path<W: Write>(mut writer: W, path: &[Position]) -> io::Result<()> {
    for pos in path {
        writeln!(writer, "{} {}", pos.row(), pos.col())?;
    }
    writeln!(writer, ".")
}

pub fn write_path<P: AsRef<Path>>(path: P, positions: &[Position]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create given file({}).", path.as_ref().display()))?;
    let mut writer = BufWriter::new(file);
    format_path(&mut writer, positions)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write given file({}).", path.as_ref().display()))?;
    log::debug!(
        "Wrote {} line(s) to file({}).",
        positions.len() + 1,
        path.as_ref().display()
    );

    Ok(())
}

/// Reads the maze, searches it, and writes the found path. Nothing is written unless a path is found.
pub fn run(args: &CLIArgs) -> Result<Vec<Position>> {
    let maze = read_maze(&args.input_path).with_context(|| {
        format!(
            "Failed to read maze from given file({}).",
            args.input_path.display()
        )
    })?;
    let path = maze.shortest_path()?;
    log::info!(
        "Found a path of {} step(s) from {} to {}.",
        path.len().saturating_sub(1),
        maze.start(),
        maze.end()
    );
    write_path(&args.output_path, &path).with_context(|| {
        format!(
            "Failed to write path to given file({}).",
            args.output_path.display()
        )
    })?;

    Ok(path)
}
