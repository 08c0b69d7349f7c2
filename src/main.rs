use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::info;

use teller::audit::TransactionLog;
use teller::cli::Shell;
use teller::config::{resolve_log_path, Settings, TellerPaths};
use teller::services::Ledger;

#[derive(Parser)]
#[command(
    name = "teller",
    version,
    about = "Named monetary accounts with an append-only transaction log",
    long_about = "Teller keeps a set of named accounts in memory for the length of a \
                  session and records every deposit, withdrawal and transfer to a \
                  plain-text transaction log."
)]
struct Cli {
    /// Transaction log file [default: transactions.txt in the working directory]
    #[arg(long, env = "TELLER_LOG_FILE", global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Diagnostic output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive ledger shell (default)
    Shell,

    /// Show resolved configuration, or change saved settings
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Save the symbol used when displaying balances
    #[arg(long, value_name = "SYMBOL")]
    currency: Option<String>,

    /// Save a default transaction log location
    #[arg(long, value_name = "PATH", conflicts_with = "clear_default_log")]
    default_log: Option<PathBuf>,

    /// Forget the saved transaction log location
    #[arg(long)]
    clear_default_log: bool,
}

impl ConfigArgs {
    fn changes_settings(&self) -> bool {
        self.currency.is_some() || self.default_log.is_some() || self.clear_default_log
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    teller::logging::init(cli.verbose);

    let paths = TellerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let log_path = resolve_log_path(cli.log_file, &settings);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            info!(log = %log_path.display(), "starting ledger shell");
            let ledger = Ledger::new(TransactionLog::new(log_path));
            let shell = Shell::new(&ledger, settings.currency_symbol.as_str());

            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            shell.run(stdin.lock(), io::stdout().lock(), interactive)?;
        }
        Commands::Config(args) if args.changes_settings() => {
            if let Some(symbol) = args.currency {
                settings.currency_symbol = symbol;
            }
            if let Some(path) = args.default_log {
                settings.log_file = Some(path);
            }
            if args.clear_default_log {
                settings.log_file = None;
            }
            settings.save(&paths)?;
            info!(file = %paths.settings_file().display(), "settings saved");
            println!("Settings saved to {}", paths.settings_file().display());
        }
        Commands::Config(_) => {
            println!("Teller Configuration");
            println!("====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Transaction log:  {}", log_path.display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Schema version:  {}", settings.schema_version);
        }
    }

    Ok(())
}
