use std::io;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::config::CoreLoadSpec;
use crate::loadgen;

/// Drive load generation for one core: pin to it when the platform
/// allows, run the duty-cycle loop, report completion.
///
/// A failed pin is not an error; the load is still generated, just
/// wherever the scheduler puts the thread.
pub fn run_core(spec: CoreLoadSpec, duration: Option<Duration>, cancel: &AtomicBool) {
    match pin_to_core(spec.core_index) {
        Ok(()) => println!(
            "Generating {:3}% load on CPU{}...",
            spec.target_load, spec.core_index
        ),
        Err(err) => {
            eprintln!(
                "cpuloadgen: could not pin to CPU{} ({}), generating load unpinned",
                spec.core_index, err
            );
            println!("Generating {:3}% load...", spec.target_load);
        }
    }

    loadgen::run(spec.target_load, duration, cancel);

    println!("Load generation on CPU{} completed.", spec.core_index);
}

#[cfg(target_os = "linux")]
fn pin_to_core(core_index: usize) -> io::Result<()> {
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core_index, &mut set);
        if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn pin_to_core(_core_index: usize) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "core affinity not supported on this platform",
    ))
}
