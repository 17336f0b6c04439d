//! CLI entry point for the tile set generator

use clap::Parser;
use tilesmith::io::cli::{Cli, GenerationRunner};
use tilesmith::io::logging::init_logging;

fn main() -> tilesmith::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    let mut runner = GenerationRunner::new(cli);
    runner.run().map(|_| ())
}
