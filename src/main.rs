use clap::{Parser, ValueEnum};
use log::{debug, info, LevelFilter};
use ordered_treap::alloc::DebugAllocator;
use ordered_treap::compare::Natural;
use ordered_treap::stats::SampleStats;
use ordered_treap::treap::TreapMap;
use rand::{Rng, SeedableRng, XorShiftRng};
use simplelog::{Config, SimpleLogger};
use std::collections::BTreeMap;
use std::hint::black_box;
use std::mem;
use std::process;
use std::time::{Duration, Instant};

/// Compares indexed assignment on `TreapMap` against `BTreeMap`.
#[derive(Debug, Parser)]
#[command(name = "ordered-treap")]
struct Args {
    /// Number of assignments timed per sample.
    #[arg(long, default_value_t = 1024)]
    operations: usize,

    /// Minimum wall time to keep sampling for, in milliseconds.
    #[arg(long, default_value_t = 15_000)]
    min_millis: u64,

    /// Minimum number of samples per container before the results count as stable.
    #[arg(long, default_value_t = 30)]
    min_samples: usize,

    /// Largest coefficient of variation, in percent, accepted as stable.
    #[arg(long, default_value_t = 1.0)]
    max_cv: f64,

    /// Upper bound on sampling rounds, whether or not the results are stable.
    #[arg(long, default_value_t = 100_000)]
    max_rounds: usize,

    /// Seed for the generated keys and for the treap priorities.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Drop samples more than three standard deviations from the mean before reporting.
    #[arg(long)]
    trim_outliers: bool,

    /// Run a short workload under the logging allocator instead of the benchmark.
    #[arg(long)]
    diagnostic: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> LevelFilter {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

trait AssignMap {
    fn assign(&mut self, key: u32, value: u32);
}

impl AssignMap for BTreeMap<u32, u32> {
    fn assign(&mut self, key: u32, value: u32) {
        *self.entry(key).or_default() = value;
    }
}

impl AssignMap for TreapMap<u32, u32> {
    fn assign(&mut self, key: u32, value: u32) {
        *self.get_or_insert_default(key) = value;
    }
}

// Returns the mean time of one assignment, in nanoseconds.
fn sample<M: AssignMap>(mut map: M, keys: &[u32]) -> f64 {
    let start = Instant::now();
    for pair in keys.windows(2) {
        map.assign(pair[0], pair[1]);
    }
    let elapsed = start.elapsed();
    black_box(&map);
    elapsed.as_nanos() as f64 / (keys.len() - 1) as f64
}

fn print_stats(name: &str, stats: &SampleStats) {
    println!("{}:", name);
    if stats.is_empty() {
        println!("no samples");
        println!();
        return;
    }
    println!("n: {}", stats.len());
    println!("mean: {:4.1} +- {:3.1} ns", stats.mean(), 2.0 * stats.stddev());
    println!("median: {:4.1} ns", stats.median());
    println!("cv: {:2.1}%", stats.cv_percent());
    println!("min: {:4.1} ns", stats.min());
    println!("max: {:4.1} ns", stats.max());
    println!();
}

fn benchmark(args: &Args) {
    let mut rng: XorShiftRng = SeedableRng::from_seed([
        args.seed as u32 | 1,
        (args.seed >> 32) as u32,
        0x2545_f491,
        0x9e37_79b9,
    ]);
    let keys: Vec<u32> = (0..=args.operations).map(|_| rng.next_u32()).collect();

    let mut btree_stats = SampleStats::new();
    let mut treap_stats = SampleStats::new();
    let min_duration = Duration::from_millis(args.min_millis);
    let start = Instant::now();
    let mut round = 0;
    while round < args.max_rounds
        && (start.elapsed() < min_duration
            || !btree_stats.is_stable(args.min_samples, args.max_cv)
            || !treap_stats.is_stable(args.min_samples, args.max_cv))
    {
        btree_stats.push(sample(BTreeMap::<u32, u32>::new(), &keys));
        treap_stats.push(sample(TreapMap::<u32, u32>::with_seed(args.seed), &keys));
        round += 1;
        if round % 1000 == 0 {
            info!("finished round #{}", round);
        }
    }

    if args.trim_outliers {
        btree_stats.remove_outliers();
        treap_stats.remove_outliers();
    }
    print_stats("BTreeMap<u32, u32>", &btree_stats);
    print_stats("TreapMap<u32, u32>", &treap_stats);
}

fn diagnostic(args: &Args) {
    let mut btree: BTreeMap<u32, u32> = BTreeMap::new();
    let mut treap: TreapMap<u32, u32, Natural, DebugAllocator> =
        TreapMap::with_allocator(DebugAllocator::default());
    btree.assign(0, 1);
    *treap.get_or_insert_default(0) = 1;

    for key in 1..args.operations.min(16) as u32 {
        treap.insert(key, key);
    }
    for key in (1..args.operations.min(16) as u32).step_by(2) {
        treap.erase(&key);
    }
    debug!("treap contents: {:?}", treap);

    println!("BTreeMap: {} bytes", mem::size_of::<BTreeMap<u32, u32>>());
    println!(
        "TreapMap: {} bytes",
        mem::size_of::<TreapMap<u32, u32, Natural, DebugAllocator>>()
    );
    println!(
        "allocations: {}, deallocations: {}, live: {}",
        treap.node_pool().allocations(),
        treap.node_pool().deallocations(),
        treap.node_pool().live(),
    );
}

fn check_args(args: &Args) -> Result<(), &'static str> {
    if args.operations < 2 {
        return Err("--operations must be at least 2");
    }
    if args.max_rounds == 0 {
        return Err("--max-rounds must be at least 1");
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = SimpleLogger::init(args.log_level.into(), Config::default()) {
        eprintln!("error: could not initialize logging: {}", err);
        process::exit(1);
    }

    if let Err(message) = check_args(&args) {
        eprintln!("error: {}", message);
        process::exit(2);
    }

    if args.diagnostic {
        diagnostic(&args);
    } else {
        benchmark(&args);
    }
}

#[cfg(test)]
mod tests {
    use super::{check_args, Args};
    use clap::Parser;

    fn parse(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ordered-treap").chain(flags.iter().cloned()))
            .unwrap()
    }

    #[test]
    fn test_defaults_accepted() {
        assert_eq!(check_args(&parse(&[])), Ok(()));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(check_args(&parse(&["--max-rounds", "0"])).is_err());
    }

    #[test]
    fn test_too_few_operations_rejected() {
        assert!(check_args(&parse(&["--operations", "1"])).is_err());
        assert_eq!(check_args(&parse(&["--operations", "2"])), Ok(()));
    }
}
