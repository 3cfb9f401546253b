use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxbridge::AppCommand;
use fxbridge::cli::setup::setup;
use fxbridge::core::log::init_logging;

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

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Rates => AppCommand::Rates,
            Commands::Convert {
                amount,
                from,
                to,
                email,
                subject,
            } => AppCommand::Convert {
                amount,
                from,
                to,
                email,
                subject,
            },
            Commands::Chart { from, to, days } => AppCommand::Chart { from, to, days },
            Commands::History { search } => AppCommand::History { search },
            Commands::Watch => AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Refresh and display current exchange rates
    Rates,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, `,` is accepted as the decimal separator
        amount: String,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
        /// Send the result to this address
        #[arg(long)]
        email: Option<String>,
        /// Subject for the emailed result
        #[arg(long, requires = "email")]
        subject: Option<String>,
    },
    /// Display historical rates between two currencies
    Chart {
        from: String,
        to: String,
        /// Window length, one of the configured chart_days
        #[arg(short, long, default_value_t = 30)]
        days: u32,
    },
    /// Display past conversions
    History {
        /// Only show conversions matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Keep refreshing rates until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxbridge::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
