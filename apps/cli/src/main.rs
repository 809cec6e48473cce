//! PageBuilder CLI: assemble pages from content fragments.
//!
//! Reads page properties (JSON or a form-encoded `templateProperties`
//! field), renders them through the configured layout, and writes the
//! resulting HTML to stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
