//! Replays a synthetic workload against a demand-paged address space and
//! reports the disk and fault traffic it generated.
//!
//! Usage: `virtmem <npages> <nframes> <rand|fifo|custom> <sort|scan|focus>`

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use virtmem::pager::Pager;
use virtmem::replacer::Policy;
use virtmem::workload::Workload;

/// Demand-paging simulator: compares page replacement policies against
/// synthetic access patterns.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Number of virtual pages in the address space.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    npages: u64,

    /// Number of physical frames backing it.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    nframes: u64,

    /// Page replacement policy.
    #[arg(value_enum)]
    policy: Policy,

    /// Access pattern to replay.
    #[arg(value_enum)]
    workload: Workload,

    /// Seed for every randomized component of the run.
    #[arg(long, default_value_t = 62087)]
    seed: u64,

    /// Log every fault and swap decision (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr; stdout carries only the final counters.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let npages = cli.npages as usize;
    let nframes = cli.nframes as usize;

    info!(
        npages,
        nframes,
        policy = ?cli.policy,
        workload = ?cli.workload,
        seed = cli.seed,
        "starting run"
    );

    let mut pager = Pager::new(npages, nframes, cli.policy.build(cli.seed));

    cli.workload
        .run(&mut pager, cli.seed)
        .context("workload failed its self-check")?;

    let stats = pager.stats();
    println!("disk writes: {}", stats.disk_writes);
    println!("disk reads:  {}", stats.disk_reads);
    println!("page faults: {}", stats.page_faults);

    Ok(())
}
