use crate::advance::{run_optimize, run_select, OptimizeArgs, SelectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rent_advance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rent Advance Optimizer",
    about = "Suggest which properties and terms cover a requested rent advance",
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
    /// Work with advance allocations from the command line
    Advance {
        #[command(subcommand)]
        command: AdvanceCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AdvanceCommand {
    /// Suggest properties and term-months for a target amount
    Optimize(OptimizeArgs),
    /// Total an operator-chosen set of properties and term-months
    Select(SelectArgs),
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
        Command::Advance {
            command: AdvanceCommand::Optimize(args),
        } => run_optimize(args),
        Command::Advance {
            command: AdvanceCommand::Select(args),
        } => run_select(args),
    }
}
