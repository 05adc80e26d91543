use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stagehand", version, about = "Studio developer support tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Pins,
    Serve,
    Relicense {
        #[arg(help = "Source file whose license header should be migrated")]
        path: PathBuf,
    },
}
