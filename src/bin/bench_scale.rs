#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use barrier_life::{Grid, SerialLife, simulate};
use rand::RngCore;
use rand::SeedableRng;
use std::time::Instant;

const LIVE_DENSITY: f64 = 0.42;

fn seed_random_grid(size: usize) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    let threshold = (u64::MAX as f64 * LIVE_DENSITY) as u64;
    let mut grid = Grid::new(size);
    for row in 0..size {
        for col in 0..size {
            if rng.next_u64() <= threshold {
                grid.set_alive(row, col);
            }
        }
    }
    grid
}

fn bench_serial(grid: &Grid, iterations: u64) -> (f64, u64) {
    let mut engine = SerialLife::new(grid.clone());
    let start = Instant::now();
    engine.step_n(iterations);
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, engine.grid().population())
}

fn bench_workers(grid: &Grid, iterations: u64, workers: usize) -> (f64, u64) {
    let start = Instant::now();
    let result = simulate(grid.clone(), iterations, workers).expect("worker count fits the grid");
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, result.population())
}

fn worker_sweep(max: usize) -> Vec<usize> {
    let mut counts = vec![1];
    while let Some(&last) = counts.last() {
        if last * 2 > max {
            break;
        }
        counts.push(last * 2);
    }
    if counts.last() != Some(&max) {
        counts.push(max);
    }
    counts
}

fn main() {
    let scales: &[(usize, u64)] = &[(256, 200), (512, 100), (1024, 50), (2048, 20)];
    let max_workers = num_cpus::get().max(1);

    println!(
        "{:<12} {:>8} {:>8} {:>12} {:>10} {:>9}",
        "Grid", "Workers", "Iters", "Total(ms)", "Avg(ms)", "Speedup"
    );
    println!("{}", "-".repeat(64));

    for &(size, iters) in scales {
        let grid = seed_random_grid(size);
        let label = format!("{size}x{size}");
        let (serial_ms, serial_pop) = bench_serial(&grid, iters);
        println!(
            "{:<12} {:>8} {:>8} {:>12.1} {:>10.4} {:>9}",
            label,
            "serial",
            iters,
            serial_ms,
            serial_ms / iters as f64,
            "1.00x"
        );

        for workers in worker_sweep(max_workers.min(size)) {
            let (total_ms, pop) = bench_workers(&grid, iters, workers);
            let status = if pop == serial_pop { "" } else { " MISMATCH" };
            println!(
                "{:<12} {:>8} {:>8} {:>12.1} {:>10.4} {:>8.2}x{status}",
                label,
                workers,
                iters,
                total_ms,
                total_ms / iters as f64,
                serial_ms / total_ms
            );
        }
    }
}
