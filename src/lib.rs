//! Conway's Game of Life (B3/S23) on a bounded square grid, stepped by a
//! fixed pool of workers that meet at a rendezvous barrier every generation.

pub mod barrierlife;
pub mod error;
pub mod serial;
pub mod text;

pub use barrierlife::{Grid, Simulation, SimulationConfig, simulate};
pub use error::{Error, Result};
pub use serial::SerialLife;
