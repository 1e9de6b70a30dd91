//! Budget CLI commands
//!
//! Budget standing for the simulated business: starter monthly budgets with
//! spending taken from the live transactions.

use clap::Subcommand;

use super::dashboard::{OutputFormat, SessionArgs};
use crate::config::Settings;
use crate::display::format_budget_overview;
use crate::error::{LedgerError, LedgerResult};
use crate::models::User;
use crate::services::{apply_spending, starter_budgets, BudgetOverview, LedgerService};

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Show each budget's spending and status
    Status {
        #[command(flatten)]
        session: SessionArgs,

        /// Scope to one user by email (defaults to the admin view)
        #[arg(long)]
        user: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Handle budget commands
pub fn handle_budget_command(settings: &Settings, cmd: BudgetCommands) -> LedgerResult<()> {
    match cmd {
        BudgetCommands::Status {
            session,
            user,
            format,
        } => handle_status(settings, &session, user.as_deref(), format),
    }
}

fn handle_status(
    settings: &Settings,
    session: &SessionArgs,
    email: Option<&str>,
    format: OutputFormat,
) -> LedgerResult<()> {
    let session = session.start(settings);
    let data = session.store().snapshot();
    let viewer = find_viewer(&data.users, email)?;

    let mut budgets = starter_budgets(viewer.id, session.now().date_naive());
    apply_spending(&mut budgets, &data.transactions);
    let ledger = LedgerService::for_user(viewer, data.transactions, budgets);

    let overview = BudgetOverview::of(ledger.budgets());
    let summary = ledger.financial_summary();
    let symbol = settings.currency_symbol.as_str();

    match format {
        OutputFormat::Table => {
            println!(
                "Budgets for {} ({})",
                ledger.viewer().business_name,
                ledger.viewer().name
            );
            print!("{}", format_budget_overview(&overview, symbol));
            println!(
                "Income {} | Expenditure {} | Profit {} | Budget used {:.1}%",
                summary.total_income.format_with_symbol(symbol),
                summary.total_expenditure.format_with_symbol(symbol),
                summary.profit.format_with_symbol(symbol),
                summary.budget_utilization
            );
        }
        OutputFormat::Json => {
            let body = serde_json::json!({ "overview": overview, "summary": summary });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

/// The user named by `email`, or the first admin
fn find_viewer(users: &[User], email: Option<&str>) -> LedgerResult<User> {
    let found = match email {
        Some(email) => users.iter().find(|u| u.email.eq_ignore_ascii_case(email)),
        None => users.iter().find(|u| u.is_admin()),
    };
    found
        .cloned()
        .ok_or_else(|| LedgerError::user_not_found(email.unwrap_or("admin")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::MockGenerator;
    use chrono::Utc;

    #[test]
    fn test_find_viewer() {
        let users = MockGenerator::with_seed(3).initial_data(Utc::now()).users;

        assert!(find_viewer(&users, None).unwrap().is_admin());

        let target = &users[4];
        let upper = target.email.to_uppercase();
        assert_eq!(find_viewer(&users, Some(&upper)).unwrap().id, target.id);

        let missing = find_viewer(&users, Some("nobody@example.com")).unwrap_err();
        assert!(missing.is_not_found());
    }
}
