use clap::{Parser, Subcommand};
use cogalign::{align, batch};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align two word forms given on the command line.
    Align(align::Cli),

    /// Align many pairs of word forms read from a file.
    Batch(batch::Cli),
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Align(cli) => align::cli(cli),
        Command::Batch(cli) => batch::cli(cli),
    }
}
