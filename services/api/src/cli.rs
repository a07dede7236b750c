use crate::scan::{run_scan, run_tiers, ScanArgs, TiersArgs};
use crate::server;
use applyflow::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "applyflow",
    about = "Classify application forms and enforce interview guarantees",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service and background sweeps (default command)
    Serve(ServeArgs),
    /// Detect, validate, and plan a fill for a saved application page
    Scan(ScanArgs),
    /// Print the effective subscription tier table
    Tiers(TiersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Scan(args) => run_scan(args),
        Command::Tiers(args) => run_tiers(args),
    }
}
