//! Square cell matrix backed by one contiguous row-major buffer.

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[inline(always)]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }
}

impl From<bool> for Cell {
    #[inline(always)]
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

/// Live neighbours of `(row, col)` in a `size * size` buffer, clipped at the
/// edges. The cell itself is not counted.
///
/// Callers guarantee `row < size`, `col < size` and `cells.len() == size * size`.
#[inline(always)]
pub fn neighbor_count_in(cells: &[Cell], size: usize, row: usize, col: usize) -> u8 {
    debug_assert!(row < size && col < size);
    debug_assert_eq!(cells.len(), size * size);

    let row_lo = row.saturating_sub(1);
    let row_hi = (row + 1).min(size - 1);
    let col_lo = col.saturating_sub(1);
    let col_hi = (col + 1).min(size - 1);

    let mut count = 0u8;
    for r in row_lo..=row_hi {
        let base = r * size;
        for c in col_lo..=col_hi {
            count += cells[base + c] as u8;
        }
    }
    count - cells[row * size + col] as u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-dead `size * size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Dead; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.size + col] = cell;
    }

    pub fn set_alive(&mut self, row: usize, col: usize) {
        self.set(row, col, Cell::Alive);
    }

    #[inline(always)]
    pub fn neighbor_count(&self, row: usize, col: usize) -> u8 {
        neighbor_count_in(&self.cells, self.size, row, col)
    }

    pub fn population(&self) -> u64 {
        self.cells().iter().filter(|c| c.is_alive()).count() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }

    pub fn for_each_live<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (row, cells) in self.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_alive() {
                    f(row, col);
                }
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // `chunks_exact(0)` panics, and a zero-sized grid has no rows anyway.
        self.cells.chunks_exact(self.size.max(1))
    }

    /// The row-major backing buffer.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}
