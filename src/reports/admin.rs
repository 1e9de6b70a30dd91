//! Admin Overview Report
//!
//! Platform-wide figures for administrators: user counts, submitted
//! reports by status, and revenue and expense totals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::analytics::KindTotals;
use crate::error::LedgerResult;
use crate::models::{Money, Report, ReportStatus, Transaction, User};

/// Number of reports listed under "latest submissions"
pub const LATEST_REPORT_LIMIT: usize = 5;

/// Admin overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub generated_at: DateTime<Utc>,
    pub total_users: usize,
    pub active_users: usize,
    pub admins: usize,
    pub total_transactions: usize,
    /// Income across every live transaction
    pub transaction_revenue: Money,
    /// Every status appears, including those with no reports
    pub reports_by_status: BTreeMap<ReportStatus, usize>,
    /// Sums over the submitted reports
    pub reported_revenue: Money,
    pub reported_expenses: Money,
    /// Newest first
    pub latest_reports: Vec<Report>,
}

impl AdminOverview {
    pub fn generate(
        users: &[User],
        reports: &[Report],
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Self {
        let mut reports_by_status: BTreeMap<ReportStatus, usize> = [
            ReportStatus::Pending,
            ReportStatus::Reviewed,
            ReportStatus::Approved,
            ReportStatus::Rejected,
        ]
        .into_iter()
        .map(|status| (status, 0))
        .collect();
        for report in reports {
            *reports_by_status.entry(report.status).or_default() += 1;
        }

        let mut latest_reports = reports.to_vec();
        latest_reports.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        latest_reports.truncate(LATEST_REPORT_LIMIT);

        Self {
            generated_at: now,
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active).count(),
            admins: users.iter().filter(|u| u.is_admin()).count(),
            total_transactions: transactions.len(),
            transaction_revenue: KindTotals::of(transactions).revenue,
            reports_by_status,
            reported_revenue: reports.iter().map(|r| r.total_revenue).sum(),
            reported_expenses: reports.iter().map(|r| r.total_expenses).sum(),
            latest_reports,
        }
    }

    pub fn reported_net(&self) -> Money {
        self.reported_revenue - self.reported_expenses
    }

    pub fn pending_reports(&self) -> usize {
        self.reports_by_status
            .get(&ReportStatus::Pending)
            .copied()
            .unwrap_or(0)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Admin Overview ({})\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Users: {} total, {} active, {} admin\n",
            self.total_users, self.active_users, self.admins
        ));
        output.push_str(&format!(
            "Live transactions: {} ({} income)\n\n",
            self.total_transactions, self.transaction_revenue
        ));

        output.push_str("Reports by status\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for (status, count) in &self.reports_by_status {
            output.push_str(&format!("  {:<20} {:>6}\n", status.to_string(), count));
        }

        output.push_str(&format!(
            "\n{:<22} {:>16}\n{:<22} {:>16}\n{:<22} {:>16}\n",
            "Reported revenue:",
            self.reported_revenue.to_string(),
            "Reported expenses:",
            self.reported_expenses.to_string(),
            "Reported net:",
            self.reported_net().to_string()
        ));

        if !self.latest_reports.is_empty() {
            output.push_str("\nLatest submissions\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for report in &self.latest_reports {
                output.push_str(&format!(
                    "  {} {:<10} {:<9} {:>16}\n",
                    report.submitted_at.format("%Y-%m-%d"),
                    report.report_type.to_string(),
                    report.status.to_string(),
                    report.net_profit().to_string()
                ));
            }
        }

        output
    }

    /// Export the status counts and totals as CSV
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        writeln!(writer, "Metric,Value")?;
        writeln!(writer, "Total Users,{}", self.total_users)?;
        writeln!(writer, "Active Users,{}", self.active_users)?;
        writeln!(writer, "Admins,{}", self.admins)?;
        writeln!(writer, "Live Transactions,{}", self.total_transactions)?;
        writeln!(writer, "Transaction Revenue,{}", self.transaction_revenue.amount())?;
        for (status, count) in &self.reports_by_status {
            writeln!(writer, "Reports {},{}", status, count)?;
        }
        writeln!(writer, "Reported Revenue,{}", self.reported_revenue.amount())?;
        writeln!(writer, "Reported Expenses,{}", self.reported_expenses.amount())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::MockGenerator;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_from_initial_data() {
        let data = MockGenerator::with_seed(21).initial_data(now());
        let overview = AdminOverview::generate(&data.users, &data.reports, &data.transactions, now());

        assert_eq!(overview.total_users, 25);
        assert_eq!(overview.admins, 1);
        assert_eq!(overview.total_transactions, 50);
        assert_eq!(overview.reports_by_status.len(), 4);
        assert_eq!(overview.reports_by_status.values().sum::<usize>(), 10);
        assert_eq!(
            overview.pending_reports(),
            data.reports.iter().filter(|r| r.is_pending()).count()
        );
        assert_eq!(
            overview.reported_net(),
            data.reports.iter().map(|r| r.net_profit()).sum::<Money>()
        );
        assert_eq!(overview.latest_reports.len(), LATEST_REPORT_LIMIT);
        assert!(overview
            .latest_reports
            .windows(2)
            .all(|pair| pair[0].submitted_at >= pair[1].submitted_at));
    }

    #[test]
    fn test_empty_platform() {
        let overview = AdminOverview::generate(&[], &[], &[], now());
        assert_eq!(overview.total_users, 0);
        assert_eq!(overview.pending_reports(), 0);
        assert_eq!(overview.reported_net(), Money::zero());
        assert!(overview.format_terminal().contains("Users: 0 total"));
    }

    #[test]
    fn test_export_csv() {
        let data = MockGenerator::with_seed(4).initial_data(now());
        let overview = AdminOverview::generate(&data.users, &data.reports, &data.transactions, now());

        let mut buffer = Vec::new();
        overview.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("Metric,Value\n"));
        assert!(csv.contains("Total Users,25\n"));
        assert!(csv.contains("Reports pending,"));
    }
}
