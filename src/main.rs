use anyhow::Result;
use clap::{Parser, Subcommand};

use ledgerpulse::analytics::TimeRange;
use ledgerpulse::cli::{
    handle_admin, handle_budget_command, handle_calc, handle_dashboard, handle_export_command,
    handle_interest, handle_notifications, handle_pay, handle_transactions, handle_watch,
    BudgetCommands, ExportArgs, OutputFormat, SessionArgs,
};
use ledgerpulse::config::{LedgerPaths, Settings};
use ledgerpulse::display::format_category_list;
use ledgerpulse::models::{CategoryCatalog, TransactionKind};

#[derive(Parser)]
#[command(
    name = "ledgerpulse",
    version,
    about = "Small-business financial dashboard with simulated live data",
    long_about = "LedgerPulse computes dashboard analytics (revenue, expenses, \
                  margins, growth and trends) over a simulated live feed of \
                  business transactions, with budgets, payments and a calculator \
                  alongside."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the analytics dashboard
    Dashboard {
        /// Time range: today, week, month, quarter or year
        #[arg(short, long)]
        range: Option<TimeRange>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Follow the live feed in real time
    Watch {
        /// Number of live transactions to wait for
        #[arg(short, long, default_value = "5")]
        ticks: u32,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long)]
        range: Option<TimeRange>,
    },

    /// List live transactions, most recently ingested first
    #[command(alias = "txn")]
    Transactions {
        #[arg(short, long, default_value = "20")]
        limit: usize,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show the notification feed
    Notifications {
        /// Mark every notification as read
        #[arg(long)]
        mark_read: bool,

        /// Remove every notification
        #[arg(long)]
        clear: bool,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// List the transaction categories
    Categories {
        /// Only income or expenditure categories
        #[arg(short, long)]
        kind: Option<TransactionKind>,
    },

    /// Run a key sequence on the calculator, e.g. "12+30/2="
    Calc {
        /// Keys: digits, '.', + - * / (or x × ÷), '=', '%', 'r' (square root), 'c' (clear)
        keys: String,
    },

    /// Simple interest on a principal
    Interest {
        principal: f64,
        /// Annual rate in percent
        rate: f64,
        years: f64,
        /// Also show twelve months of this monthly amount
        #[arg(long)]
        monthly: Option<f64>,
    },

    /// Make a simulated card payment
    Pay {
        /// Amount, e.g. "250000" or "₦250,000"
        amount: String,
        description: String,
        /// Seed for a reproducible approve/decline outcome
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export data to CSV, JSON or YAML
    Export(ExportArgs),

    /// Platform overview for administrators
    Admin {
        /// Write the figures as CSV
        #[arg(long)]
        csv: bool,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Onboarding state
    #[command(subcommand)]
    Onboarding(OnboardingCommands),

    /// Show current configuration and paths
    Config,
}

#[derive(Subcommand)]
enum OnboardingCommands {
    /// Show whether onboarding has been completed
    Status,
    /// Mark onboarding as completed
    Complete,
    /// Clear the onboarding flag
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    ledgerpulse::logging::init(&settings.log_level)?;
    tracing::debug!(base_dir = %paths.base_dir().display(), "settings loaded");

    match cli.command {
        Some(Commands::Dashboard {
            range,
            format,
            session,
        }) => handle_dashboard(&settings, &session, range, format)?,
        Some(Commands::Watch { ticks, seed, range }) => {
            handle_watch(&settings, seed, ticks, range)?
        }
        Some(Commands::Transactions {
            limit,
            format,
            session,
        }) => handle_transactions(&settings, &session, limit, format)?,
        Some(Commands::Notifications {
            mark_read,
            clear,
            session,
        }) => handle_notifications(&settings, &session, mark_read, clear)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&settings, cmd)?,
        Some(Commands::Categories { kind }) => {
            let catalog = CategoryCatalog::defaults();
            match kind {
                Some(kind) => print!("{}", format_category_list(catalog.for_kind(kind))),
                None => print!("{}", format_category_list(catalog.all())),
            }
        }
        Some(Commands::Calc { keys }) => handle_calc(&keys)?,
        Some(Commands::Interest {
            principal,
            rate,
            years,
            monthly,
        }) => handle_interest(&settings, principal, rate, years, monthly)?,
        Some(Commands::Pay {
            amount,
            description,
            seed,
        }) => handle_pay(&settings, &amount, &description, seed)?,
        Some(Commands::Export(args)) => handle_export_command(&paths, &settings, args)?,
        Some(Commands::Admin { csv, session }) => handle_admin(&settings, &session, csv)?,
        Some(Commands::Onboarding(cmd)) => match cmd {
            OnboardingCommands::Status => {
                if settings.onboarding_completed {
                    println!("Onboarding completed.");
                } else {
                    println!("Onboarding not completed.");
                }
            }
            OnboardingCommands::Complete => {
                settings.onboarding_completed = true;
                settings.save(&paths)?;
                println!("Onboarding marked as completed.");
            }
            OnboardingCommands::Reset => {
                settings.onboarding_completed = false;
                settings.save(&paths)?;
                println!("Onboarding reset.");
            }
        },
        Some(Commands::Config) => {
            println!("LedgerPulse Configuration");
            println!("=========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Exports directory: {}", paths.exports_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:       {}", settings.currency_symbol);
            println!("  Date format:           {}", settings.date_format);
            println!("  Default time range:    {}", settings.default_time_range);
            println!("  Onboarding completed:  {}", settings.onboarding_completed);
            println!("  Log level:             {}", settings.log_level);
            println!(
                "  Transaction interval:  {} ms",
                settings.realtime.transaction_interval_ms
            );
            println!(
                "  Notification interval: {} ms",
                settings.realtime.notification_interval_ms
            );
            println!(
                "  Decline probability:   {}",
                settings.payments.decline_probability
            );
        }
        None => {
            println!("LedgerPulse - Small-business financial dashboard");
            println!();
            println!("Run 'ledgerpulse --help' for usage information.");
            println!("Run 'ledgerpulse dashboard' to see this month's figures.");
        }
    }

    Ok(())
}
