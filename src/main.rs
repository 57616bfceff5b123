use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use ufx::core::CurrencyUnit;
use ufx::core::log::init_logging;

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

impl From<Commands> for ufx::AppCommand {
    fn from(cmd: Commands) -> ufx::AppCommand {
        match cmd {
            Commands::Rate { date } => ufx::AppCommand::Rate { date },
            Commands::Convert { amount, from, date } => ufx::AppCommand::Convert {
                amount,
                unit: from,
                date,
            },
            Commands::History { start, end } => ufx::AppCommand::History { start, end },
            Commands::Stats => ufx::AppCommand::Stats,
            Commands::CacheClear { date } => ufx::AppCommand::CacheClear { date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the UF value for a date (today by default)
    Rate {
        /// Date in YYYY-MM-DD format
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Convert an amount between CLP and UF
    Convert {
        /// Amount to convert
        amount: f64,
        /// Unit of the amount (clp or uf)
        #[arg(short, long, default_value = "clp")]
        from: CurrencyUnit,
        /// Date in YYYY-MM-DD format
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Display UF values for a date range with statistics
    History {
        /// Start date in YYYY-MM-DD format
        start: NaiveDate,
        /// End date in YYYY-MM-DD format
        end: NaiveDate,
    },
    /// Display day-over-day variation and source availability
    Stats,
    /// Clear cached UF values
    CacheClear {
        /// Date in YYYY-MM-DD format; clears everything when omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ufx::cli::setup::setup(),
        Some(cmd) => ufx::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
