use clap::Parser;
use retrieval_pipeline::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Search(args) => cli::search::run(args).await,
        Command::Health(args) => cli::health::run(args).await,
    }
}
