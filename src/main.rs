mod benchmarks;

use benchmarks::{BfsParams, QuicksortParams, Summary};
use clap::Parser;
use parbench::DEFAULT_CUTOVER;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Name of benchmark to run: bfs, quicksort or all.
    #[arg()]
    benchmark: Option<String>,

    /// Number of timed trials per variant.
    #[arg(short, long, default_value_t = 5)]
    trials: usize,

    /// Side length of the BFS lattice cube.
    #[arg(short, long, default_value_t = 100)]
    size: u32,

    /// Number of integers to sort.
    #[arg(short, long, default_value_t = 10_000_000)]
    length: usize,

    /// Largest slice the parallel quicksort sorts without forking.
    #[arg(short, long, default_value_t = DEFAULT_CUTOVER)]
    cutover: usize,

    /// Worker threads in the rayon pool. Defaults to one per core.
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Directory the benchmark reports are written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Write reports to stdout instead of files.
    #[arg(long)]
    stdout: bool,

    /// Seed for the sort input generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Creates a logger, filtering out all log messages except those from this crate.
    // RUST_LOG still overrides the defaults.
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(log::LevelFilter::Off)
        .filter_module(module_path!(), level)
        .format_timestamp_nanos()
        .parse_default_env()
        .init();

    if let Some(threads) = args.threads {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            eprintln!("{}", benchmarks::BenchError::from(err));
            process::exit(1);
        }
    }

    let result = match args.benchmark.as_deref() {
        Some("bfs") => run_bfs(&args).map(|s| vec![s]),
        Some("quicksort") => run_quicksort(&args).map(|s| vec![s]),
        Some("all") => run_bfs(&args).and_then(|bfs| Ok(vec![bfs, run_quicksort(&args)?])),
        Some(other) => {
            eprintln!("Unknown benchmark: {}", other);
            process::exit(1);
        }
        None => {
            eprintln!("No benchmark specified.");
            process::exit(1);
        }
    };

    match result {
        Ok(summaries) => {
            for summary in summaries {
                log::info!(
                    "{}: avg sequential {} ms, avg parallel {} ms, speedup {:.2}x",
                    summary.name,
                    summary.avg_sequential_ms,
                    summary.avg_parallel_ms,
                    summary.speedup()
                );
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn run_bfs(args: &Args) -> benchmarks::Result<Summary> {
    let out = benchmarks::open_output(&args.output_dir, "bfs_benchmark.txt", args.stdout)?;
    let params = BfsParams {
        size: args.size,
        trials: args.trials,
    };
    benchmarks::bfs(&params, out)
}

fn run_quicksort(args: &Args) -> benchmarks::Result<Summary> {
    let out = benchmarks::open_output(&args.output_dir, "quicksort_benchmark.txt", args.stdout)?;
    let params = QuicksortParams {
        length: args.length,
        trials: args.trials,
        cutover: args.cutover,
        seed: args.seed,
    };
    benchmarks::quicksort(&params, out)
}
