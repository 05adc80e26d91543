use clap::Parser;

use stagehand::cli::{Cli, Commands};
use stagehand::commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pins => commands::handle_pins(),
        Commands::Serve => commands::handle_serve(),
        Commands::Relicense { path } => commands::handle_relicense(&path),
    }
}
