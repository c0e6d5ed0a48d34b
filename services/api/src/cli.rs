use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qualiotrack::error::AppError;

use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Qualiotrack",
    about = "Run the Qualiopi compliance-evidence service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Path to the feed bootstrap JSON (defaults to the builtin source list)
    #[arg(long)]
    pub(crate) feeds_config: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
    }
}
