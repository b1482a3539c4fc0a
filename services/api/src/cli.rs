use crate::report::run_dashboard;
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabular_insights::dashboards::{DashboardKind, FieldFilter};
use tabular_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tabular Insights",
    about = "Serve or print HR, retail and telecom dashboards computed from CSV exports",
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
    /// Compute a single dashboard and print it
    Dashboard(DashboardArgs),
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

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Dashboard to compute: hr, retail or telecom
    pub(crate) dashboard: DashboardKind,
    /// CSV export to read instead of the configured data file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Keep only records where FIELD equals VALUE (repeatable)
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    pub(crate) filters: Vec<FieldFilter>,
    /// Maximum number of entries in the risk list
    #[arg(long)]
    pub(crate) risk_limit: Option<usize>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard(args) => run_dashboard(args),
    }
}
