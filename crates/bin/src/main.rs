use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so `--format json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nestree=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Show(args) => commands::tree::show(&args),
        Commands::Parents(args) => commands::tree::parents(&args),
        Commands::Move(args) => commands::edit::move_node(&args),
        Commands::Create(args) => commands::edit::create(&args),
        Commands::Edit(args) => commands::edit::edit(&args),
        Commands::Delete(args) => commands::edit::delete(&args),
        Commands::Fix(args) => commands::edit::fix(&args),
        Commands::Serve(args) => commands::serve::run(&args).await,
    }
}
