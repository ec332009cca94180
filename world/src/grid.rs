//! Fixed-size cell storage addressed by column and row.

use handlords_core::{Cell, CellCoord, GridView, ARENA_COLUMNS, ARENA_ROWS};

/// Row-major cell storage with bounds-checked addressing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    ///
    /// Dimensions whose cell count does not fit in memory collapse to an empty
    /// 0x0 grid, so [`Grid::contains`] never accepts a coordinate without a cell.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).ok();
        Self::sized(columns, rows, capacity)
    }

    fn sized(columns: u32, rows: u32, capacity: Option<usize>) -> Self {
        match capacity {
            Some(capacity) => Self {
                columns,
                rows,
                cells: vec![Cell::Empty; capacity],
            },
            None => Self {
                columns: 0,
                rows: 0,
                cells: Vec::new(),
            },
        }
    }

    /// Creates an empty grid sized like the standard arena.
    #[must_use]
    pub fn arena() -> Self {
        Self::new(ARENA_COLUMNS, ARENA_ROWS)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.column() < self.columns && coord.row() < self.rows
    }

    /// Returns the cell at `coord`.
    ///
    /// # Panics
    ///
    /// Panics when `coord` lies outside the grid. Coordinates derived from
    /// random draws must pass [`Grid::contains`] first.
    #[must_use]
    pub fn at(&self, coord: CellCoord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    /// Returns the cell at `coord` for mutation.
    ///
    /// # Panics
    ///
    /// Panics when `coord` lies outside the grid.
    pub fn at_mut(&mut self, coord: CellCoord) -> &mut Cell {
        let index = self.index(coord);
        &mut self.cells[index]
    }

    /// Resets every cell to [`Cell::Empty`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells in row-major order, for mutation.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Captures a read-only view over the cells.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    fn index(&self, coord: CellCoord) -> usize {
        assert!(
            self.contains(coord),
            "cell {coord:?} lies outside the {}x{} grid",
            self.columns,
            self.rows
        );
        coord.row() as usize * self.columns as usize + coord.column() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlords_core::{PieceKind, PlayerId};

    #[test]
    fn arena_starts_empty() {
        let grid = Grid::arena();
        assert_eq!(grid.columns(), 40);
        assert_eq!(grid.rows(), 24);
        assert_eq!(grid.cells().len(), 960);
        assert!(grid.cells().iter().all(|cell| *cell == Cell::Empty));
    }

    #[test]
    fn addressing_is_row_major() {
        let mut grid = Grid::new(3, 2);
        *grid.at_mut(CellCoord::new(2, 1)) = Cell::Wall;
        assert_eq!(grid.cells()[5], Cell::Wall);
        assert_eq!(*grid.at(CellCoord::new(2, 1)), Cell::Wall);
    }

    #[test]
    fn contains_rejects_coordinates_past_the_edge() {
        let grid = Grid::new(3, 2);
        assert!(grid.contains(CellCoord::new(2, 1)));
        assert!(!grid.contains(CellCoord::new(3, 0)));
        assert!(!grid.contains(CellCoord::new(0, 2)));
    }

    #[test]
    fn unaddressable_dimensions_collapse_to_an_empty_grid() {
        let grid = Grid::sized(u32::MAX, u32::MAX, None);

        assert_eq!((grid.columns(), grid.rows()), (0, 0));
        assert!(grid.cells().is_empty());
        assert!(!grid.contains(CellCoord::new(0, 0)));
        assert!(!grid.contains(CellCoord::new(5, 5)));
    }

    #[test]
    fn degenerate_grids_contain_nothing() {
        for grid in [Grid::new(0, 5), Grid::new(5, 0)] {
            assert!(grid.cells().is_empty());
            assert!(!grid.contains(CellCoord::new(0, 0)));
            assert_eq!(grid.cells().len(), grid.columns() as usize * grid.rows() as usize);
        }
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_lookup_panics() {
        let grid = Grid::new(2, 1);
        let _ = grid.at(CellCoord::new(2, 0));
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut grid = Grid::new(2, 2);
        *grid.at_mut(CellCoord::new(0, 0)) = Cell::Wall;
        *grid.at_mut(CellCoord::new(1, 1)) = Cell::Owned {
            owner: PlayerId::new(1),
            piece: PieceKind::Paper,
        };

        grid.clear();

        assert!(grid.cells().iter().all(|cell| *cell == Cell::Empty));
    }
}
