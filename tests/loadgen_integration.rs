//! End-to-end scenarios for the load generator: a bounded partial-load
//! run that must stop on its own, and an unbounded full-load run that
//! must stop only when cancelled. Both run real workers against the real
//! clock, so the timing assertions leave room for scheduling slack.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpuloadgen::config::{CoreLoadSpec, RunConfig};
use cpuloadgen::orchestrator;

#[test]
fn bounded_half_load_run_terminates_on_schedule() {
    let config = RunConfig {
        duration: Some(Duration::from_secs(1)),
        cores: vec![CoreLoadSpec { core_index: 0, target_load: 50 }],
    };
    let cancel = Arc::new(AtomicBool::new(false));

    let start = Instant::now();
    orchestrator::run(&config, &cancel);
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_secs(1), "stopped early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "overran: {:?}", elapsed);
}

#[test]
fn indefinite_full_load_terminates_only_on_cancellation() {
    let cores = (0..num_cpus::get().min(2))
        .map(|core_index| CoreLoadSpec { core_index, target_load: 100 })
        .collect();
    let config = RunConfig { duration: None, cores };
    let cancel = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&cancel);
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        flag.store(true, Ordering::Relaxed);
    });

    let start = Instant::now();
    orchestrator::run(&config, &cancel);
    let elapsed = start.elapsed();
    stopper.join().unwrap();

    assert!(elapsed >= Duration::from_millis(300), "stopped early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5), "cancellation not observed: {:?}", elapsed);
}
