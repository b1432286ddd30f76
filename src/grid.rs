use thiserror::Error;

use crate::cell::{Cell, CellKind, are_similar};
use crate::coords::{GRID_X, GRID_Y, GRID_Z, GridBox, GridCoord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(GridCoord),
}

/// Dense 16x64x16 block world. Exclusively owned by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self::filled(Cell::Empty)
    }

    pub fn filled(fill: Cell) -> Self {
        let size = (GRID_X as usize) * (GRID_Y as usize) * (GRID_Z as usize);
        Self {
            cells: vec![fill; size],
        }
    }

    fn index(&self, c: GridCoord) -> Option<usize> {
        if !c.in_grid() {
            return None;
        }
        let idx = ((c.y * GRID_X + c.x) * GRID_Z + c.z) as usize;
        Some(idx)
    }

    pub fn get(&self, c: GridCoord) -> Result<Cell, GridError> {
        self.index(c)
            .map(|i| self.cells[i])
            .ok_or(GridError::OutOfBounds(c))
    }

    /// Bounds-folded read: anything outside the grid, including the open
    /// air above layer 0, reads as `Empty`.
    pub fn cell_at(&self, c: GridCoord) -> Cell {
        self.get(c).unwrap_or(Cell::Empty)
    }

    /// Writes inside the grid. A write outside is a logic defect and panics.
    pub fn set(&mut self, c: GridCoord, cell: Cell) {
        let Some(i) = self.index(c) else {
            panic!("grid write outside bounds at {c}");
        };
        self.cells[i] = cell;
    }

    pub fn exists(&self, c: GridCoord) -> bool {
        self.cell_at(c).is_occupied()
    }

    pub fn is_mineable_at(&self, c: GridCoord) -> bool {
        self.cell_at(c).is_mineable()
    }

    pub fn is_marker_at(&self, c: GridCoord) -> bool {
        self.cell_at(c).is_marker()
    }

    pub fn are_similar_at(&self, a: GridCoord, b: GridCoord) -> bool {
        are_similar(self.cell_at(a), self.cell_at(b))
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridCoord, CellKind)> + '_ {
        GridBox::full()
            .iter_cells()
            .filter_map(|c| self.cell_at(c).kind().map(|k| (c, k)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Tier;

    #[test]
    fn index_and_bounds() {
        let g = Grid::new();
        assert!(g.index(GridCoord::new(0, 0, 0)).is_some());
        assert!(g.index(GridCoord::new(15, 63, 15)).is_some());
        assert!(g.index(GridCoord::new(-1, 0, 0)).is_none());
        assert!(g.index(GridCoord::new(0, 64, 0)).is_none());
        assert!(g.index(GridCoord::new(0, 0, 16)).is_none());
    }

    #[test]
    fn get_reports_out_of_bounds() {
        let g = Grid::new();
        let c = GridCoord::new(0, -1, 0);
        assert_eq!(g.get(c), Err(GridError::OutOfBounds(c)));
        assert_eq!(g.cell_at(c), Cell::Empty);
        assert!(!g.exists(c));
    }

    #[test]
    fn set_then_query() {
        let mut g = Grid::new();
        let c = GridCoord::new(5, 3, 6);
        g.set(c, Cell::terrain());
        assert!(g.exists(c));
        assert!(g.is_mineable_at(c));
        assert_eq!(g.get(c), Ok(Cell::terrain()));
        g.set(c, Cell::Empty);
        assert!(!g.exists(c));
    }

    #[test]
    fn similarity_across_coordinates() {
        let mut g = Grid::new();
        let two = Cell::gem(Tier::new(2).unwrap());
        g.set(GridCoord::new(6, 3, 5), two);
        g.set(GridCoord::new(7, 3, 5), two);
        assert!(g.are_similar_at(GridCoord::new(6, 3, 5), GridCoord::new(7, 3, 5)));
        assert!(!g.are_similar_at(GridCoord::new(6, 3, 5), GridCoord::new(8, 3, 5)));
        assert!(!g.are_similar_at(GridCoord::new(15, 3, 5), GridCoord::new(16, 3, 5)));
    }

    #[test]
    fn occupied_iteration() {
        let mut g = Grid::new();
        g.set(GridCoord::new(1, 1, 1), Cell::marker());
        g.set(GridCoord::new(2, 2, 2), Cell::terrain());
        assert_eq!(g.occupied_count(), 2);
        let cells: Vec<_> = g.occupied_cells().map(|(c, _)| c).collect();
        assert_eq!(cells, vec![GridCoord::new(1, 1, 1), GridCoord::new(2, 2, 2)]);
    }

    #[test]
    #[should_panic(expected = "outside bounds")]
    fn write_outside_panics() {
        let mut g = Grid::new();
        g.set(GridCoord::new(16, 0, 0), Cell::terrain());
    }
}
