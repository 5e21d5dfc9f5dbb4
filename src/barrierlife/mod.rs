//! Barrier-synchronised, row-partitioned Game of Life engine.

mod barrier;
mod engine;
mod grid;
mod partition;
mod simulation;

pub use barrier::{Arrival, BreakOnPanic, RendezvousBarrier};
pub use engine::next_state;
pub use grid::{Cell, Grid, neighbor_count_in};
pub use partition::{RowRange, check_coverage, compute_ranges};
pub use simulation::{Simulation, SimulationConfig, simulate};
