//! Randstream CLI
//!
//! Streams pseudo-random bytes to stdout (or a file) as fast as the sink
//! accepts them.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use randstream::{Algorithm, RunConfig, RunError, WriteSink};
use std::fs::File;
use std::io::{self, ErrorKind};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum AlgorithmArg {
    /// Marsaglia xorshift, 192-bit state (default)
    Xorshift96,
    /// xorshift64* with a finalizing multiply
    Xorshift64,
    /// Constant zero bytes
    Zero,
    /// Repeat the seed word forever
    Const,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Xorshift96 => Self::XorShift96,
            AlgorithmArg::Xorshift64 => Self::XorShift64,
            AlgorithmArg::Zero => Self::Zero,
            AlgorithmArg::Const => Self::Const,
        }
    }
}

#[derive(Parser)]
#[command(name = "randstream")]
#[command(about = "Fast stream of pseudo-random bytes", long_about = None)]
#[command(version)]
struct Cli {
    /// Generator algorithm
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Xorshift96)]
    algo: AlgorithmArg,

    /// Seed (defaults to seconds since the Unix epoch)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Total bytes to emit (0 = unbounded)
    #[arg(short, long, default_value_t = 0)]
    count: u64,

    /// Restrict output to printable ASCII [32, 126]
    #[arg(long)]
    ascii: bool,

    /// Worker pipelines (defaults to available cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let seed = match cli.seed {
        Some(seed) => seed,
        None => epoch_seed()?,
    };
    let config = RunConfig {
        algorithm: cli.algo.into(),
        seed,
        count: cli.count,
        ascii: cli.ascii,
        workers: cli.jobs.unwrap_or_else(default_workers).max(1),
    };

    let result = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            randstream::run(&config, &WriteSink::new(file))
        }
        None => randstream::run(&config, &WriteSink::new(io::stdout())),
    };

    match result {
        Ok(()) => Ok(()),
        // A reader hanging up is the normal way an unbounded stream ends.
        Err(RunError::Sink(err)) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("stream aborted"),
    }
}

/// Seed derived from the wall clock, like `time(NULL)`.
fn epoch_seed() -> Result<u64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    Ok(now.as_secs())
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
