//! Sluice command line.

mod cli;
mod logging;
mod quote;
mod scenario;

use clap::Parser;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = cli::SluiceCli::parse();
    logging::init_logging(&cli.logs)?;
    cli.run()
}
