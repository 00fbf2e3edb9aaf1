use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{CoreLoadSpec, RunConfig};
use crate::runner;

/// Spawn one worker thread per loaded core and wait for all of them.
/// Cores without an assigned load get no thread at all.
pub fn run(config: &RunConfig, cancel: &Arc<AtomicBool>) {
    run_with(config, cancel, runner::run_core);
}

fn run_with<F>(config: &RunConfig, cancel: &Arc<AtomicBool>, worker: F)
where
    F: Fn(CoreLoadSpec, Option<Duration>, &AtomicBool) + Clone + Send + 'static,
{
    let mut handles = Vec::with_capacity(config.cores.len());

    for &spec in &config.cores {
        // Moved by value: each worker owns its copy of the spec, so no
        // worker ever reads a loop variable the spawner is still mutating.
        let cancel = Arc::clone(cancel);
        let duration = config.duration;
        let worker = worker.clone();
        let spawned = thread::Builder::new()
            .name(format!("loadgen-cpu{}", spec.core_index))
            .spawn(move || worker(spec, duration, &cancel));
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => eprintln!(
                "cpuloadgen: failed to start worker for CPU{}: {}",
                spec.core_index, err
            ),
        }
    }

    // The caller's shared state stays alive until every worker has
    // stopped; nothing is torn down from inside a signal handler.
    for handle in handles {
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn each_worker_observes_its_own_core_index() {
        let config = RunConfig {
            duration: None,
            cores: (0..8)
                .map(|core_index| CoreLoadSpec { core_index, target_load: 100 })
                .collect(),
        };
        let cancel = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        run_with(&config, &cancel, move |spec, _, _| {
            sink.lock().unwrap().push(spec.core_index);
        });

        let mut seen = Arc::try_unwrap(seen).unwrap().into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn run_returns_once_all_workers_observe_cancellation() {
        let config = RunConfig {
            duration: None,
            cores: vec![
                CoreLoadSpec { core_index: 0, target_load: 100 },
                CoreLoadSpec { core_index: 1, target_load: 100 },
            ],
        };
        let cancel = Arc::new(AtomicBool::new(true));
        // Pre-cancelled: every worker must exit after a single burst.
        run(&config, &cancel);
    }
}
