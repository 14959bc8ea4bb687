//! Small tester reporting how the hash seed is acquired on this build.
//!
//! Prints the detected entropy capability table, the strategy and quality of
//! a sample acquisition, and optionally a uniqueness sweep over many
//! instances. Useful when porting to a platform whose entropy primitives are
//! uncertain.

use std::collections::HashSet;
use std::process::exit;

use clap::Parser;
use rxpat::{
    config::{DEFAULT_CONTEXT_BYTES, ParserConfig, VERSION_STRING},
    entropy::{EntropyCaps, SeedQuality, acquire_seed_report_with},
};

#[derive(Parser)]
#[command(name = "rxpatinfo", version, about = "Report entropy strategy selection and seed quality")]
struct Cli {
    /// Acquire this many seeds and report how many were distinct.
    #[arg(long, default_value_t = 1)]
    samples: usize,
    /// Skip the fast userspace generator.
    #[arg(long)]
    no_fast_rng: bool,
    /// Skip the wrapped getrandom call.
    #[arg(long)]
    no_getrandom: bool,
    /// Skip the raw getrandom syscall.
    #[arg(long)]
    no_syscall_getrandom: bool,
    /// Skip the entropy device.
    #[arg(long)]
    no_dev_urandom: bool,
    /// Exit non-zero if only the deterministic fallback is reachable.
    #[arg(long)]
    require_strong: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut caps = EntropyCaps::detect();
    if cli.no_fast_rng {
        caps.fast_rng = false;
    }
    if cli.no_getrandom {
        caps.getrandom = false;
    }
    if cli.no_syscall_getrandom {
        caps.syscall_getrandom = false;
    }
    if cli.no_dev_urandom {
        caps.urandom_device = false;
    }

    let defaults = ParserConfig::default();
    println!("{VERSION_STRING}");
    println!(
        "features: namespaces={} dtd={} context-bytes={} (default {})",
        defaults.namespaces, defaults.dtd, defaults.context_bytes, DEFAULT_CONTEXT_BYTES
    );
    println!(
        "entropy capabilities: fast-rng={} getrandom={} syscall-getrandom={} dev-urandom={}",
        caps.fast_rng, caps.getrandom, caps.syscall_getrandom, caps.urandom_device
    );

    let report = acquire_seed_report_with(&caps);
    println!(
        "strategy: {}  quality: {}  seed: {:#018x}",
        report.source,
        report.quality,
        report.seed.value()
    );

    if cli.samples > 1 {
        let mut seen = HashSet::new();
        for _ in 0..cli.samples {
            seen.insert(acquire_seed_report_with(&caps).seed);
        }
        println!("samples: {}  distinct: {}", cli.samples, seen.len());
    }

    if cli.require_strong && report.quality == SeedQuality::Weak {
        eprintln!("rxpatinfo: no strong entropy strategy is available");
        exit(1);
    }
}
