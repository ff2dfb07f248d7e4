mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{shp2geojson, simplify, split};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    match &cli.command {
        Commands::Simplify(args) => simplify::run(&cli, args),
        Commands::Split(args) => split::run(&cli, args),
        Commands::Shp2Geojson(args) => shp2geojson::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
