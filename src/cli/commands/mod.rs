//! Command implementations for the port receiving CLI
//!
//! Each command is implemented in its own module:
//! - `process`: full pipeline with CSV outputs
//! - `check`: column resolution only

pub mod check;
pub mod process;
pub mod shared;

pub use shared::RunStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand handler
///
/// Returns `Ok(None)` when no subcommand was given.
pub fn run(args: &Args) -> Result<Option<RunStats>> {
    match args.get_command() {
        Some(Commands::Process(process_args)) => process::run_process(process_args).map(Some),
        Some(Commands::Check(check_args)) => check::run_check(check_args).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_without_command_does_nothing() {
        let args = Args::try_parse_from(["port-receiving"]).unwrap();
        assert!(run(&args).unwrap().is_none());
    }
}
