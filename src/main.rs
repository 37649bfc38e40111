mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod presenter;
mod services;
#[cfg(test)]
mod test_support;
mod workflow;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::parse::{self as parse_cmd, ParseCommandArgs};
use crate::cmd::report_error;
use crate::cmd::ticket::{self, TicketCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;

const LOG_ENV: &str = "DESKBOT_LOG";

#[derive(Parser)]
#[command(
    name = "deskbot",
    author,
    version,
    about = "Turn helpdesk issue descriptions into ticket titles and summaries"
)]
struct Cli {
    /// Verbose logging and full error diagnostics.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a ticket name and summary for an issue.
    Ticket(TicketArgs),
    /// Parse a saved model reply from a file or stdin.
    Parse(ParseArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct TicketArgs {
    /// Requester's name.
    #[arg(long)]
    name: Option<String>,
    /// Requester's username.
    #[arg(short, long)]
    username: Option<String>,
    /// Requester's ID number.
    #[arg(long = "id")]
    identifier: Option<String>,
    /// Building or room.
    #[arg(short, long)]
    location: Option<String>,
    /// Description of the issue.
    #[arg(short, long)]
    issue: Option<String>,
    /// Reply shape to ask the model for (lines or json).
    #[arg(short, long)]
    format: Option<String>,
    /// Which repeated label wins (first or last).
    #[arg(long)]
    duplicates: Option<String>,
    /// Copy a field to the clipboard after generating (repeatable).
    #[arg(short, long = "copy", value_name = "FIELD")]
    copy: Vec<String>,
    /// Review, edit and copy fields interactively.
    #[arg(short, long)]
    review: bool,
    /// Also print the raw model reply.
    #[arg(long)]
    raw: bool,
    /// Leave fields not given by flag empty instead of prompting.
    #[arg(long)]
    no_input: bool,
}

#[derive(Args)]
struct ParseArgs {
    /// File holding the reply; stdin when omitted.
    file: Option<PathBuf>,
    /// Which repeated label wins (first or last).
    #[arg(long)]
    duplicates: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let debug = cli.debug;
    if let Err(error) = run(cli).await {
        report_error(&error, debug);
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("deskbot=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("deskbot=warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Parse(args) => {
            let config = AppConfig::load()?;
            parse_cmd::run(
                ParseCommandArgs {
                    file: args.file,
                    duplicates: args.duplicates,
                },
                config.duplicate_policy,
            )
        }
        Commands::Ticket(args) => run_ticket(args, cli.debug).await,
    }
}

async fn run_ticket(args: TicketArgs, debug: bool) -> AppResult<()> {
    let config = AppConfig::load()?;
    let context = AppContext::from_config(config)?;

    ticket::run(
        &context,
        TicketCommandArgs {
            name: args.name,
            username: args.username,
            identifier: args.identifier,
            location: args.location,
            issue: args.issue,
            format: args.format,
            duplicates: args.duplicates,
            copy: args.copy,
            review: args.review,
            raw: args.raw,
            no_input: args.no_input,
            debug,
        },
    )
    .await
}
