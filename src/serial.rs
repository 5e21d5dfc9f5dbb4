//! Single-threaded reference stepper for the bounded grid.

use crate::barrierlife::{Cell, Grid};

pub struct SerialLife {
    current: Grid,
    next: Grid,
    generation: u64,
}

impl SerialLife {
    pub fn new(grid: Grid) -> Self {
        let next = Grid::new(grid.size());
        Self {
            current: grid,
            next,
            generation: 0,
        }
    }

    pub fn step(&mut self) {
        let size = self.current.size();
        for row in 0..size {
            for col in 0..size {
                let neighbors = self.current.neighbor_count(row, col);
                let alive = self.current.get(row, col).is_alive();
                let next_alive = if alive {
                    neighbors == 2 || neighbors == 3
                } else {
                    neighbors == 3
                };
                self.next.set(row, col, Cell::from(next_alive));
            }
        }
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn into_grid(self) -> Grid {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
