use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::workload::workload;

/// Burst size for the partial-load duty cycle. Long enough to amortize
/// the timing calls, short enough to keep the duty cycle responsive.
pub const PARTIAL_LOAD_ITERATIONS: u32 = 50_000;

/// Burst size between deadline checks when running flat out.
pub const FULL_LOAD_ITERATIONS: u32 = 1_000_000;

/// Monotonic time source for the control loop. Production code uses
/// [`SystemClock`]; tests drive the loop with a deterministic fake.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&mut self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Idle time needed after a measured burst to average out at the target
/// load, PWM style: `total = active * 100 / (target + 1)`, idle is the
/// remainder. The `+ 1` biases the effective load slightly below the
/// nominal target, absorbing measurement and sleep overhead.
///
/// A burst that overruns its expected cost would make the remainder
/// negative; it is clamped to zero instead of being handed to the sleep
/// primitive as a wrapped-around unsigned value.
pub fn duty_cycle_idle(active: Duration, target_load: u32) -> Duration {
    let active_us = active.as_secs_f64() * 1e6;
    let total_us = active_us * 100.0 / (target_load as f64 + 1.0);
    Duration::from_micros((total_us - active_us).max(0.0) as u64)
}

/// Duty-cycle control loop for one core. Runs until the duration elapses
/// (when one was set) or `cancel` is observed at a loop boundary.
/// Returns the number of completed loop iterations.
///
/// The mode is fixed for the lifetime of the loop: 100% runs back-to-back
/// bursts with no idle phase at all, anything lower alternates one
/// measured burst with one computed sleep per iteration.
pub fn generate_load<C: Clock>(
    clock: &mut C,
    mut burst: impl FnMut(u32),
    target_load: u32,
    duration: Option<Duration>,
    cancel: &AtomicBool,
) -> u64 {
    let start = clock.now();
    let mut cycles = 0u64;

    if target_load == 100 {
        loop {
            burst(FULL_LOAD_ITERATIONS);
            cycles += 1;
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            if let Some(limit) = duration {
                if clock.now() - start >= limit {
                    break;
                }
            }
        }
    } else {
        loop {
            let burst_start = clock.now();
            burst(PARTIAL_LOAD_ITERATIONS);
            let active = clock.now() - burst_start;

            let idle = duty_cycle_idle(active, target_load);
            if !idle.is_zero() {
                clock.sleep(idle);
            }

            cycles += 1;
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            if let Some(limit) = duration {
                if clock.now() - start >= limit {
                    break;
                }
            }
        }
    }

    cycles
}

/// Run the control loop against the real clock and the real workload.
pub fn run(target_load: u32, duration: Option<Duration>, cancel: &AtomicBool) {
    let mut clock = SystemClock::new();
    generate_load(&mut clock, workload, target_load, duration, cancel);
}
