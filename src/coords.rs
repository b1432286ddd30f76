use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid extent along x.
pub const GRID_X: i32 = 16;
/// Grid extent along y (depth, increasing downward).
pub const GRID_Y: i32 = 64;
/// Grid extent along z.
pub const GRID_Z: i32 = 16;

/// Depth of the open air above layer 0. Has no grid backing.
pub const SURFACE_DEPTH: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy, dz) = dir.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    pub fn in_grid(self) -> bool {
        (0..GRID_X).contains(&self.x) && (0..GRID_Y).contains(&self.y) && (0..GRID_Z).contains(&self.z)
    }

    /// Component along the axis `dir` moves on.
    pub fn along(self, dir: Direction) -> i32 {
        match dir {
            Direction::East | Direction::West => self.x,
            Direction::Down | Direction::Up => self.y,
            Direction::North | Direction::South => self.z,
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// One of the six unit moves. Down is +y because depth grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    West,
    North,
    South,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
        Direction::Down,
        Direction::Up,
    ];

    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::North => (0, 0, 1),
            Direction::South => (0, 0, -1),
            Direction::Down => (0, 1, 0),
            Direction::Up => (0, -1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }

    /// Signed unit step along the moving axis.
    pub fn sign(self) -> i32 {
        match self {
            Direction::East | Direction::North | Direction::Down => 1,
            Direction::West | Direction::South | Direction::Up => -1,
        }
    }

    pub fn dy(self) -> i32 {
        self.offset().1
    }

    pub fn key(self) -> char {
        match self {
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::North => 'n',
            Direction::South => 's',
            Direction::Down => 'd',
            Direction::Up => 'u',
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        Direction::ALL.into_iter().find(|d| d.key() == c.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBox {
    pub min: GridCoord, // inclusive
    pub max: GridCoord, // inclusive
}

impl GridBox {
    pub fn new(min: GridCoord, max: GridCoord) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "Invalid GridBox bounds"
        );
        Self { min, max }
    }

    /// The whole backed grid.
    pub fn full() -> Self {
        Self::new(GridCoord::new(0, 0, 0), GridCoord::new(GRID_X - 1, GRID_Y - 1, GRID_Z - 1))
    }

    /// One depth slice of the grid.
    pub fn layer(y: i32) -> Self {
        Self::new(GridCoord::new(0, y, 0), GridCoord::new(GRID_X - 1, y, GRID_Z - 1))
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= self.min.x
            && c.x <= self.max.x
            && c.y >= self.min.y
            && c.y <= self.max.y
            && c.z >= self.min.z
            && c.z <= self.max.z
    }

    pub fn iter_cells(self) -> impl Iterator<Item = GridCoord> {
        let min = self.min;
        let max = self.max;
        (min.y..=max.y).flat_map(move |y| {
            (min.x..=max.x).flat_map(move |x| (min.z..=max.z).map(move |z| GridCoord { x, y, z }))
        })
    }

    /// Cells on the horizontal rim of each layer in the box.
    pub fn border_cells(self) -> impl Iterator<Item = GridCoord> {
        let min = self.min;
        let max = self.max;
        self.iter_cells()
            .filter(move |c| c.x == min.x || c.x == max.x || c.z == min.z || c.z == max.z)
    }
}
