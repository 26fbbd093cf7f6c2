//! CROPPAD CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run the
//! requested transform, and exit with appropriate status.

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
