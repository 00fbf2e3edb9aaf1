use std::time::Duration;

use anyhow::{bail, Result};

/// Load assignment for a single CPU core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreLoadSpec {
    pub core_index: usize,
    /// Target utilization percentage, 1..=100.
    pub target_load: u32,
}

/// Validated run configuration. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// `None` means run until cancelled.
    pub duration: Option<Duration>,
    pub cores: Vec<CoreLoadSpec>,
}

impl RunConfig {
    /// Parse `cpuN=LOAD` / `duration=SECONDS` arguments (any order).
    ///
    /// With no arguments at all, every detected core gets 100% load and
    /// the run is unbounded.
    pub fn from_args(args: &[String], core_count: usize) -> Result<RunConfig> {
        if args.is_empty() {
            return Ok(RunConfig {
                duration: None,
                cores: (0..core_count)
                    .map(|core_index| CoreLoadSpec {
                        core_index,
                        target_load: 100,
                    })
                    .collect(),
            });
        }

        let mut loads: Vec<Option<u32>> = vec![None; core_count];
        let mut duration: Option<u64> = None;

        for arg in args {
            if let Some(rest) = arg.strip_prefix("cpu") {
                let (index, load) = parse_core_assignment(rest, arg, core_count)?;
                if let Some(previous) = loads[index] {
                    bail!("CPU{} was already assigned a load of {}", index, previous);
                }
                loads[index] = Some(load);
            } else if let Some(rest) = arg.strip_prefix("duration=") {
                let seconds: u64 = match rest.parse() {
                    Ok(s) if s >= 1 => s,
                    _ => bail!("invalid argument ({})", arg),
                };
                if let Some(previous) = duration {
                    bail!("duration was already set to {}", previous);
                }
                duration = Some(seconds);
            } else {
                bail!("invalid argument ({})", arg);
            }
        }

        Ok(RunConfig {
            duration: duration.map(Duration::from_secs),
            cores: loads
                .iter()
                .enumerate()
                .filter_map(|(core_index, load)| {
                    load.map(|target_load| CoreLoadSpec {
                        core_index,
                        target_load,
                    })
                })
                .collect(),
        })
    }
}

fn parse_core_assignment(rest: &str, arg: &str, core_count: usize) -> Result<(usize, u32)> {
    let Some((index, load)) = rest.split_once('=') else {
        bail!("invalid argument ({})", arg);
    };
    let index: usize = match index.parse() {
        Ok(n) if n < core_count => n,
        _ => bail!("invalid argument ({})", arg),
    };
    let load: u32 = match load.parse() {
        Ok(l) if (1..=100).contains(&l) => l,
        _ => bail!("invalid argument ({})", arg),
    };
    Ok((index, load))
}
