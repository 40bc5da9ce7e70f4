//! Command-line interface for agent-bench.
//!
//! Every option falls back to an environment variable, so a run can be
//! configured entirely from the environment.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli};
