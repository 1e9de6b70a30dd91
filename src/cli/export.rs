//! CLI commands for data export
//!
//! Writes the simulated session's data to a file. Without `--output` the
//! file goes to the exports directory under a timestamped name.

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::dashboard::SessionArgs;
use crate::analytics::{self, TimeRange};
use crate::config::{LedgerPaths, Settings};
use crate::error::{LedgerError, LedgerResult};
use crate::export::{csv, json, yaml, DashboardExport};
use crate::models::{User, UserId};
use crate::services::{apply_spending, starter_budgets};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (transactions, or budgets with --budgets)
    Csv,
    /// JSON format (full dashboard)
    Json,
    /// YAML format (full dashboard, human-readable)
    Yaml,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Output file path (defaults to the exports directory)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write to standard output instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Export budgets instead of transactions (CSV only)
    #[arg(long)]
    pub budgets: bool,

    /// Range for the analytics section (JSON and YAML)
    #[arg(short, long)]
    pub range: Option<TimeRange>,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Handle the export command
pub fn handle_export_command(
    paths: &LedgerPaths,
    settings: &Settings,
    args: ExportArgs,
) -> LedgerResult<()> {
    if args.budgets && args.format != ExportFormat::Csv {
        return Err(LedgerError::Validation(
            "--budgets is only available for CSV exports".into(),
        ));
    }

    let session = args.session.start(settings);
    let data = session.store().snapshot();
    let now = session.now();

    let mut buffer = Vec::new();
    let (what, count) = match args.format {
        ExportFormat::Csv if args.budgets => {
            let mut budgets = starter_budgets(session_owner(&data.users), now.date_naive());
            apply_spending(&mut budgets, &data.transactions);
            csv::export_budgets_csv(&budgets, &mut buffer)?;
            ("budgets", budgets.len())
        }
        ExportFormat::Csv => {
            csv::export_transactions_csv(&data.transactions, &mut buffer)?;
            ("transactions", data.transactions.len())
        }
        ExportFormat::Json | ExportFormat::Yaml => {
            let range = args.range.unwrap_or(settings.default_time_range);
            let snapshot = analytics::compute(&data.transactions, range, now);
            let export = DashboardExport::new(&data, snapshot, now);
            if args.format == ExportFormat::Json {
                json::export_dashboard_json(&export, &mut buffer)?;
            } else {
                yaml::export_dashboard_yaml(&export, &mut buffer)?;
            }
            ("dashboard", data.transactions.len())
        }
    };

    if args.stdout {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(&buffer)?;
        out.flush()?;
        return Ok(());
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            paths.ensure_directories()?;
            paths.exports_dir().join(format!(
                "ledgerpulse-{}-{}.{}",
                what,
                now.format("%Y%m%d-%H%M%S"),
                args.format.extension()
            ))
        }
    };

    let file = File::create(&output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&buffer)?;
    writer.flush()?;

    tracing::info!(path = %output.display(), what, count, "export written");
    println!("Exported {} ({} records) to: {}", what, count, output.display());
    Ok(())
}

/// Budgets are owned by the admin, or a fresh id when there is none
fn session_owner(users: &[User]) -> UserId {
    users
        .iter()
        .find(|u| u.is_admin())
        .map(|u| u.id)
        .unwrap_or_default()
}
