use std::panic;
use std::sync::OnceLock;
use std::thread;
use std::time::Instant;

use tracing::info;

use super::engine::{SimulationContext, StartGate};
use super::grid::Grid;
use super::partition::{RowRange, check_coverage, compute_ranges};
use crate::error::{Error, Result};

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

/// Resolve and validate the worker count for a `grid_size` grid.
fn resolve_worker_count(config: &SimulationConfig, grid_size: usize) -> Result<usize> {
    if grid_size == 0 {
        return Err(Error::EmptyGrid);
    }
    match config.worker_count {
        None => Ok(physical_core_count().min(grid_size)),
        Some(0) => Err(Error::NoWorkers),
        Some(workers) if workers > grid_size => Err(Error::TooManyWorkers {
            workers,
            size: grid_size,
        }),
        Some(workers) => Ok(workers),
    }
}

/// Configuration for a [`Simulation`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfig {
    /// Number of worker threads, one per row range.
    /// `None` means one per physical core, capped at the grid size.
    pub worker_count: Option<usize>,
}

impl SimulationConfig {
    /// Set an explicit worker count. Validated against the grid size when
    /// the simulation is built.
    pub fn worker_count(mut self, n: usize) -> Self {
        self.worker_count = Some(n);
        self
    }
}

/// Owns the grid pair and the generation countdown, and drives the worker
/// pool.
#[derive(Debug)]
pub struct Simulation {
    /// `grids[0]` holds the latest generation between runs.
    grids: [Grid; 2],
    steps: u64,
    remaining: u64,
    ranges: Vec<RowRange>,
}

impl Simulation {
    /// Validate the configuration and partition the rows. No thread is
    /// started here.
    pub fn new(grid: Grid, steps: u64, config: &SimulationConfig) -> Result<Self> {
        let size = grid.size();
        let workers = resolve_worker_count(config, size)?;
        let ranges = compute_ranges(workers, size);
        check_coverage(&ranges, size);

        Ok(Self {
            grids: [grid, Grid::new(size)],
            steps,
            remaining: steps,
            ranges,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    /// Generations computed so far.
    pub fn generation(&self) -> u64 {
        self.steps - self.remaining
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn grid(&self) -> &Grid {
        &self.grids[0]
    }

    pub fn into_grid(self) -> Grid {
        let [current, _] = self.grids;
        current
    }

    /// Run every remaining generation on a fresh worker pool and join it.
    ///
    /// Returns without spawning when nothing is left to compute. On a spawn
    /// failure no generation is computed and the grid is untouched.
    pub fn run(&mut self) -> Result<()> {
        if self.remaining == 0 {
            return Ok(());
        }

        let size = self.grids[0].size();
        let workers = self.ranges.len();
        info!(size, workers, steps = self.remaining, "starting simulation");
        let start = Instant::now();

        let ranges = &self.ranges;
        let ctx = SimulationContext::new(&mut self.grids, self.remaining, workers);
        let gate = StartGate::default();

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for (worker, &range) in ranges.iter().enumerate() {
                let (ctx, gate) = (&ctx, &gate);
                let spawned = thread::Builder::new()
                    .name(format!("life-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        if gate.wait() {
                            ctx.run_worker(worker, range);
                        }
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        gate.cancel();
                        return Err(Error::WorkerSpawn(err));
                    }
                }
            }

            gate.open();
            for handle in handles {
                if let Err(payload) = handle.join() {
                    panic::resume_unwind(payload);
                }
            }
            Ok(())
        })?;

        let current = ctx.current_index();
        self.remaining = ctx.remaining();
        drop(ctx);
        if current == 1 {
            self.grids.swap(0, 1);
        }

        info!(
            generation = self.generation(),
            population = self.grids[0].population(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "simulation finished"
        );
        Ok(())
    }
}

/// Step `grid` forward `steps` generations on `workers` threads.
pub fn simulate(grid: Grid, steps: u64, workers: usize) -> Result<Grid> {
    let config = SimulationConfig::default().worker_count(workers);
    let mut simulation = Simulation::new(grid, steps, &config)?;
    simulation.run()?;
    Ok(simulation.into_grid())
}

#[cfg(test)]
mod tests {
    use super::{
        Simulation, SimulationConfig, physical_core_count, resolve_worker_count, simulate,
    };
    use crate::barrierlife::grid::Grid;
    use crate::error::Error;

    fn block(size: usize) -> Grid {
        let mut grid = Grid::new(size);
        for &(row, col) in &[(1, 1), (1, 2), (2, 1), (2, 2)] {
            grid.set_alive(row, col);
        }
        grid
    }

    #[test]
    fn worker_count_validation() {
        let explicit = |n| SimulationConfig::default().worker_count(n);
        assert!(matches!(
            resolve_worker_count(&explicit(0), 8),
            Err(Error::NoWorkers)
        ));
        assert!(matches!(
            resolve_worker_count(&explicit(9), 8),
            Err(Error::TooManyWorkers { workers: 9, size: 8 })
        ));
        assert!(matches!(
            resolve_worker_count(&explicit(1), 0),
            Err(Error::EmptyGrid)
        ));
        assert_eq!(resolve_worker_count(&explicit(8), 8).unwrap(), 8);
    }

    #[test]
    fn default_worker_count_is_capped_by_grid() {
        let config = SimulationConfig::default();
        assert_eq!(resolve_worker_count(&config, 1).unwrap(), 1);
        assert_eq!(
            resolve_worker_count(&config, 4096).unwrap(),
            physical_core_count().min(4096)
        );
    }

    #[test]
    fn zero_steps_leaves_grid_untouched() {
        let mut grid = Grid::new(5);
        grid.set_alive(0, 0);
        let mut simulation =
            Simulation::new(grid.clone(), 0, &SimulationConfig::default().worker_count(2)).unwrap();
        simulation.run().unwrap();
        assert_eq!(simulation.generation(), 0);
        assert_eq!(simulation.grid(), &grid);
    }

    #[test]
    fn run_is_idempotent_after_completion() {
        let mut simulation =
            Simulation::new(block(6), 5, &SimulationConfig::default().worker_count(3)).unwrap();
        simulation.run().unwrap();
        assert_eq!(simulation.generation(), 5);
        assert_eq!(simulation.remaining(), 0);
        simulation.run().unwrap();
        assert_eq!(simulation.generation(), 5);
        assert_eq!(simulation.grid(), &block(6));
    }

    #[test]
    fn odd_and_even_step_counts_land_in_the_returned_grid() {
        let mut lone = Grid::new(4);
        lone.set_alive(2, 2);
        for steps in 1..=4 {
            assert!(simulate(lone.clone(), steps, 2).unwrap().is_empty());
            assert_eq!(simulate(block(4), steps, 2).unwrap(), block(4));
        }
    }

    #[test]
    fn exposes_partition() {
        let simulation =
            Simulation::new(Grid::new(10), 1, &SimulationConfig::default().worker_count(4)).unwrap();
        assert_eq!(simulation.worker_count(), 4);
        let lens: Vec<usize> = simulation.ranges().iter().map(|r| r.len()).collect();
        assert_eq!(lens, vec![2, 2, 3, 3]);
    }
}
