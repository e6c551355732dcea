//! CLI entry point for the tile hashing tool

use clap::Parser;
use tilehash::io::cli::{Cli, FileProcessor};
use tilehash::io::logging::init_logging;

fn main() -> tilehash::Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(&cli.log_level)?;
    let mut processor = FileProcessor::new(cli);
    processor.process()?;
    Ok(())
}
