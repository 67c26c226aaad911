//! Dense `length × width` matrices used for the board and the per-cell infection dates.
//!
//! Storage is row-major with `x` selecting the row (`0..length`) and `y` the column
//! (`0..width`). Boards are never resized after construction.
use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::state::HealthState;

/// A cell coordinate. `x` runs along the length of the board, `y` along its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord { x, y }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    length: usize,
    width: usize,
    cells: Vec<T>,
}

/// One snapshot of the population.
pub type Board = Grid<HealthState>;

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`. Callers are responsible for
    /// rejecting zero-sized boards before getting here.
    #[must_use]
    pub fn filled(length: usize, width: usize, value: T) -> Self {
        Grid {
            length,
            width,
            cells: vec![value; length * width],
        }
    }

    /// Resets every cell to `value` without reallocating.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells, `length × width`.
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.length && coord.y < self.width
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&T> {
        if self.contains(coord) {
            Some(&self.cells[self.offset(coord)])
        } else {
            None
        }
    }

    /// Iterates over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (Coord::new(i / width, i % width), value))
    }

    /// All coordinates of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.length).flat_map(move |x| (0..width).map(move |y| Coord::new(x, y)))
    }

    /// Row `x` as a slice, for callers that want to render the board.
    #[must_use]
    pub fn row(&self, x: usize) -> &[T] {
        &self.cells[x * self.width..(x + 1) * self.width]
    }

    fn offset(&self, coord: Coord) -> usize {
        assert!(
            self.contains(coord),
            "coordinate {coord} outside of a {}x{} grid",
            self.length,
            self.width
        );
        coord.x * self.width + coord.y
    }
}

impl Board {
    /// Number of cells currently in `state`. This is a full scan; the engine keeps running
    /// tallies and only uses this to cross-check them.
    #[must_use]
    pub fn count(&self, state: HealthState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }
}

impl<T> Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coord) -> &T {
        &self.cells[self.offset(coord)]
    }
}

impl<T> IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, coord: Coord) -> &mut T {
        let offset = self.offset(coord);
        &mut self.cells[offset]
    }
}
