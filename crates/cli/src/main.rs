//! Secure NVM metadata-path simulator CLI.
//!
//! This binary provides a single entry point for driving the coalescing
//! engine. It performs:
//! 1. **Workload runs:** Replay one of the benchmark-derived traffic presets
//!    (`hashmap`, `btree`, `rbtree`, `swap`) for a bounded number of partials.
//! 2. **Configuration:** Built-in defaults, optionally overridden by a JSON
//!    config file (any omitted field keeps its default).
//! 3. **Reporting:** Sectioned statistics on exit.

use clap::{Parser, Subcommand, ValueEnum};
use std::{fs, process};

use thoth_core::Config;
use thoth_core::Simulation;
use thoth_core::config::TrafficPattern;
use thoth_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "thoth",
    author,
    version,
    about = "Secure NVM metadata cache and coalescing simulator",
    long_about = "Drive the metadata write datapath (cache -> PCB -> write queue -> NVM)\n\
                  with benchmark-derived burst traffic and report coalescing statistics.\n\n\
                  Examples:\n  thoth run --workload hashmap --partials 200000\n  \
                  thoth run --workload swap --config configs/small_cache.json --stats pcb"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workload against the metadata datapath.
    Run {
        /// JSON configuration file (omitted fields keep their defaults).
        #[arg(short, long)]
        config: Option<String>,

        /// Traffic preset to replay.
        #[arg(short, long, value_enum, default_value_t = Workload::Hashmap)]
        workload: Workload,

        /// Number of metadata partials to issue.
        #[arg(short, long, default_value_t = 100_000)]
        partials: u64,

        /// Statistics sections to print (default: all).
        #[arg(long, value_name = "SECTION")]
        stats: Vec<String>,
    },
}

/// Benchmark-derived traffic presets.
///
/// Burst shapes follow the metadata write patterns the four reference
/// workloads produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Workload {
    /// Hash table: random access, frequent small bursts.
    Hashmap,
    /// B-tree: sequential insertions, moderate bursts.
    Btree,
    /// Red-black tree: mixed access, medium-large bursts.
    Rbtree,
    /// Array swapping: contiguous access, large frequent bursts (worst case).
    Swap,
}

impl Workload {
    fn name(self) -> &'static str {
        match self {
            Workload::Hashmap => "hashmap",
            Workload::Btree => "btree",
            Workload::Rbtree => "rbtree",
            Workload::Swap => "swap",
        }
    }

    /// Applies this preset's burst shape and address pattern.
    fn apply(self, config: &mut Config) {
        let traffic = &mut config.traffic;
        match self {
            Workload::Hashmap => {
                traffic.burst_size = 100;
                traffic.burst_interval = 1_000_000_000;
                traffic.pattern = TrafficPattern::Uniform;
            }
            Workload::Btree => {
                traffic.burst_size = 50;
                traffic.burst_interval = 2_000_000_000;
                traffic.pattern = TrafficPattern::Sequential;
            }
            Workload::Rbtree => {
                traffic.burst_size = 75;
                traffic.burst_interval = 1_500_000_000;
                traffic.pattern = TrafficPattern::Uniform;
            }
            Workload::Swap => {
                traffic.burst_size = 200;
                traffic.burst_interval = 500_000_000;
                traffic.pattern = TrafficPattern::Sequential;
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            workload,
            partials,
            stats,
        } => cmd_run(config, workload, partials, stats),
    }
}

/// Loads the configuration, applies the workload preset, runs the simulation,
/// and prints the requested statistics sections.
fn cmd_run(config_path: Option<String>, workload: Workload, partials: u64, stats: Vec<String>) {
    for section in &stats {
        if !STATS_SECTIONS.contains(&section.as_str()) {
            eprintln!(
                "Unknown stats section '{}' (valid: {})",
                section,
                STATS_SECTIONS.join(", ")
            );
            process::exit(1);
        }
    }

    let mut config = match &config_path {
        Some(path) => load_config(path),
        None => Config::default(),
    };
    workload.apply(&mut config);

    println!(
        "Configuration: {}",
        config_path.as_deref().unwrap_or("default")
    );
    println!(
        "  Cache: {} sets x {} ways x {} B  PCB: {} entries  Flush: {} ms",
        config.cache.num_sets,
        config.cache.num_ways,
        config.cache.block_size,
        config.pcb.capacity,
        config.pcb.flush_interval / 1_000_000_000
    );
    println!(
        "  Workload: {}  burst {} @ {} us interval",
        workload.name(),
        config.traffic.burst_size,
        config.traffic.burst_interval / 1_000_000
    );
    println!();

    let mut sim = Simulation::new(&config).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });

    println!("[*] Issuing {} metadata partials...", partials);
    sim.run_partials(partials);
    sim.finish();

    sim.stats().print_sections(&stats);
}

/// Reads and parses a JSON configuration file; exits on failure.
fn load_config(path: &str) -> Config {
    let contents = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {}: {}", path, e);
        process::exit(1);
    });
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing config {}: {}", path, e);
        process::exit(1);
    })
}
