#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use barrier_life::text::{self, Input};
use barrier_life::{Error, Result, Simulation, SimulationConfig};
use clap::Parser;
use tracing::Level;

/// Run Conway's Game of Life on a bounded grid with a fixed pool of
/// worker threads.
///
/// Reads `<size> <steps>` followed by `size` rows (`x` = alive) and prints
/// the grid after `steps` generations.
#[derive(Debug, Parser)]
#[command(name = "barrier-life", version)]
struct Cli {
    /// Number of worker threads (1..=grid size)
    workers: usize,

    /// Read the grid from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Also print the starting grid, labelling both grids
    #[arg(long)]
    show_initial: bool,

    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load(cli: &Cli) -> Result<Input> {
    match &cli.input {
        Some(path) => text::read_from(File::open(path)?),
        None => text::read_from(io::stdin().lock()),
    }
}

/// Step `input` on `workers` threads and write the result to `out`.
fn simulate_to<W: Write>(input: Input, workers: usize, show_initial: bool, out: W) -> Result<()> {
    let Input { grid, steps } = input;
    let config = SimulationConfig::default().worker_count(workers);
    let mut simulation = Simulation::new(grid, steps, &config)?;

    // Nothing reaches `out` until the run has succeeded.
    let initial = show_initial.then(|| text::render(simulation.grid()));
    simulation.run()?;

    let mut out = BufWriter::new(out);
    if let Some(initial) = initial {
        writeln!(out, "Initial:")?;
        out.write_all(initial.as_bytes())?;
        writeln!(out, "Final:")?;
    }
    text::write_to(simulation.grid(), &mut out)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let input = load(cli)?;
    simulate_to(input, cli.workers, cli.show_initial, io::stdout().lock())
}

fn exit_code(err: &Error) -> ExitCode {
    if err.is_input() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            exit_code(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use barrier_life::Error;
    use barrier_life::text;

    use super::simulate_to;

    const BLINKER: &str = "3 1\n...\nxxx\n...\n";

    #[test]
    fn labelled_output_shows_both_grids() {
        let mut out = Vec::new();
        simulate_to(text::parse(BLINKER).unwrap(), 3, true, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Initial:\n   \nxxx\n   \nFinal:\n x \n x \n x \n"
        );
    }

    #[test]
    fn failed_run_writes_nothing() {
        let mut out = Vec::new();
        let err = simulate_to(text::parse(BLINKER).unwrap(), 4, true, &mut out).unwrap_err();
        assert!(matches!(err, Error::TooManyWorkers { workers: 4, size: 3 }));
        assert!(out.is_empty(), "wrote {:?}", String::from_utf8_lossy(&out));
    }
}
