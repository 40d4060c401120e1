//! Fixed pixel board divided into square cells.

use super::direction::Direction;

/// A position on the board, in pixels.
///
/// While on the board both coordinates are multiples of the unit size; the
/// head may step one unit outside, which is how wall collisions show up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell of `unit` pixels in a direction
    pub fn stepped(&self, direction: Direction, unit: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * unit, dy * unit)
    }
}

/// The playing field: a `width` x `height` pixel area cut into cells of
/// `unit` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    unit: i32,
}

impl Grid {
    pub fn new(width: u32, height: u32, unit: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            unit: unit as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn unit(&self) -> i32 {
        self.unit
    }

    /// Number of cells across
    pub fn columns(&self) -> i32 {
        self.width / self.unit
    }

    /// Number of cells down
    pub fn rows(&self) -> i32 {
        self.height / self.unit
    }

    pub fn cell_count(&self) -> usize {
        (self.columns().max(0) as usize) * (self.rows().max(0) as usize)
    }

    /// Pixel position of the cell at (`col`, `row`)
    pub fn cell(&self, col: i32, row: i32) -> Position {
        Position::new(col * self.unit, row * self.unit)
    }

    /// Cell coordinates of a pixel position
    pub fn cell_of(&self, pos: Position) -> (i32, i32) {
        (pos.x.div_euclid(self.unit), pos.y.div_euclid(self.unit))
    }

    /// Check if a position is within the board
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Every cell on the board, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.columns()).map(move |col| self.cell(col, row)))
    }
}
