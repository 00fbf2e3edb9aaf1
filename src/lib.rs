pub mod config;
pub mod loadgen;
pub mod orchestrator;
pub mod runner;
pub mod workload;
