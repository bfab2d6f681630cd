use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use goalfolio::cli::setup::setup;
use goalfolio::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for goalfolio::AppCommand {
    fn from(cmd: Commands) -> goalfolio::AppCommand {
        match cmd {
            Commands::Recommend => goalfolio::AppCommand::Recommend,
            Commands::Fund { scheme_code } => goalfolio::AppCommand::Fund { scheme_code },
            Commands::Search {
                query,
                limit,
                offset,
            } => goalfolio::AppCommand::Search {
                query,
                limit,
                offset,
            },
            Commands::Goals => goalfolio::AppCommand::Goals,
            Commands::Available => goalfolio::AppCommand::Available,
            Commands::Summary => goalfolio::AppCommand::Summary,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Rank the fund universe by 3-year rolling return
    Recommend,
    /// Show trailing returns for a scheme
    Fund {
        /// Scheme code, e.g. 122639
        scheme_code: String,
    },
    /// Search the fund directory by name
    Search {
        query: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Link configured goals to their investments and show progress
    Goals,
    /// Show how much of each investment is not claimed by a goal
    Available,
    /// Display portfolio summary
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => goalfolio::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
