use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use accounting::cli::{
    handle_account_command, handle_transaction_command, AccountCommands, CommandContext,
    OutputFormat, TransactionCommands,
};
use accounting::config::{paths::AccountingPaths, settings::Settings};
use accounting::error::{AccountingError, AppError, ErrorDetails};
use accounting::logging::init_tracing;
use accounting::security::{HttpSecurityValidator, SecurityCheckDispatcher};
use accounting::services::SystemClock;
use accounting::storage::Storage;

#[derive(Parser)]
#[command(
    name = "accounting",
    version,
    about = "Bank account lifecycle and transaction ledger",
    long_about = "Manages bank accounts that become usable only after an external \
                  security check of the holder passes, records deposits and \
                  withdrawals on them, and derives balances from the ledger."
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of the security validator (overrides the settings file)
    #[arg(long, global = true, env = "ACCOUNTING_VALIDATOR_URL")]
    validator_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (details, code) = match err.downcast_ref::<AccountingError>() {
                Some(e) => (e.error_details(), e.exit_code()),
                None => (
                    ErrorDetails {
                        code: AppError::Internal.value(),
                        status: 500,
                        messages: vec![format!("{:#}", err)],
                    },
                    1,
                ),
            };

            match serde_json::to_string(&details) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{:#}", err),
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = AccountingPaths::new()?;
    let mut settings = Settings::load_or_create(&paths).context("failed to load settings")?;
    if matches!(cli.command, Some(Commands::Config)) && !paths.settings_file().exists() {
        settings
            .save(&paths)
            .context("failed to write default settings")?;
    }
    if let Some(url) = cli.validator_url {
        settings.security_validator.url = url;
    }

    init_tracing(&settings.log_filter);

    let output = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("accounting - bank account lifecycle and transaction ledger");
            println!();
            println!("Run 'accounting --help' for usage information.");
            return Ok(());
        }
    };

    if let Commands::Config = command {
        print_config(&paths, &settings, output)?;
        return Ok(());
    }

    let mut storage = Storage::new(paths)?;
    storage.load_all()?;

    let validator = Arc::new(HttpSecurityValidator::new(&settings.security_validator)?);
    let security_checks =
        SecurityCheckDispatcher::start(validator, settings.security_validator.workers)?;
    let account_config = settings.account_config();
    let clock = SystemClock;

    let ctx = CommandContext {
        storage: &storage,
        account_config: &account_config,
        security_checks: &security_checks,
        clock: &clock,
        output,
    };

    match command {
        Commands::Account(cmd) => handle_account_command(&ctx, cmd)?,
        Commands::Transaction(cmd) => handle_transaction_command(&ctx, cmd)?,
        Commands::Config => {}
    }

    // Dropping the dispatcher waits for queued security checks
    Ok(())
}

fn print_config(paths: &AccountingPaths, settings: &Settings, output: OutputFormat) -> Result<()> {
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    println!("Accounting Configuration");
    println!("========================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Bank ID:              {}", settings.bank_id);
    println!("  Validator URL:        {}", settings.security_validator.url);
    println!("  Callback URL:         {}", settings.security_validator.callback_url);
    println!("  Validator workers:    {}", settings.security_validator.workers);
    println!("  Validator timeout:    {}s", settings.security_validator.timeout_secs);
    println!("  Log filter:           {}", settings.log_filter);
    Ok(())
}
