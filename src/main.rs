use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

use cpuloadgen::config::RunConfig;
use cpuloadgen::orchestrator;

/// Generate adjustable processing load on selected CPU core(s) for a
/// given duration.
#[derive(Debug, Parser)]
#[command(name = "cpuloadgen", version, after_help = AFTER_HELP)]
struct Opts {
    /// `cpuN=LOAD` assignments (LOAD in 1..=100) and an optional
    /// `duration=SECONDS`, in any order
    #[arg(value_name = "SPEC")]
    specs: Vec<String>,
}

const AFTER_HELP: &str = "\
Load is a percentage which may be any integer value between 1 and 100.
Duration time unit is seconds; if omitted, loads run until CTRL+C is pressed.
If no argument is given, generate 100% load on all online CPU cores indefinitely.

Examples:
  cpuloadgen                        100% load on all cores until CTRL+C
  cpuloadgen duration=10            100% load on all cores for 10 seconds
  cpuloadgen cpu3=100 cpu1=50 duration=5";

fn main() -> Result<()> {
    let opts = Opts::parse();

    println!("CPULOADGEN (rev {})\n", env!("CARGO_PKG_VERSION"));

    let core_count = num_cpus::get();
    print_cpu_summary(core_count);

    let config = match RunConfig::from_args(&opts.specs, core_count) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("cpuloadgen: {}", err);
            eprintln!("Run `cpuloadgen --help` for usage.");
            process::exit(2);
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        println!("\nHalting load generation...");
        flag.store(true, Ordering::Relaxed);
    })
    .context("failed to install CTRL+C handler")?;

    println!("Press CTRL+C to stop load generation at any time.\n");

    orchestrator::run(&config, &cancel);

    println!("\ndone.\n");
    Ok(())
}

fn print_cpu_summary(core_count: usize) {
    let sys =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()));
    match sys.cpus().first() {
        Some(cpu) => println!("Found {} CPU cores ({}).\n", core_count, cpu.brand()),
        None => println!("Found {} CPU cores.\n", core_count),
    }
}
