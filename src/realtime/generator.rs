//! Mock data generator
//!
//! Fabricates a plausible initial dataset and the per-tick synthetic
//! transactions and notifications that stand in for a live feed. All
//! randomness, identifiers included, comes from one `StdRng`, so a seeded
//! generator replays the same data.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{
    Money, Notification, NotificationId, NotificationKind, Report, ReportId, ReportStatus,
    ReportType, Role, Transaction, TransactionId, TransactionKind, User, UserId,
};

/// Amounts the generator draws from
pub const DENOMINATIONS: [i64; 7] = [
    50_000, 100_000, 250_000, 500_000, 750_000, 1_000_000, 1_500_000,
];

/// Categories used for the initial corpus
pub const INITIAL_CATEGORIES: [&str; 4] = ["Sales", "Marketing", "Operations", "Admin"];

/// Categories used for live ticks
pub const LIVE_CATEGORIES: [&str; 6] = [
    "Sales",
    "Marketing",
    "Operations",
    "Admin",
    "Transport",
    "Utilities",
];

pub const INITIAL_TRANSACTION_COUNT: usize = 50;
pub const INITIAL_USER_COUNT: usize = 25;
pub const INITIAL_REPORT_COUNT: usize = 10;

/// Chance that an initial-corpus transaction is income
const INITIAL_INCOME_PROBABILITY: f64 = 0.4;
const ACTIVE_USER_PROBABILITY: f64 = 0.8;
const HISTORY_DAYS: i64 = 30;

const USER_NAMES: [&str; 5] = [
    "Adebayo Ogundimu",
    "Fatima Abdullahi",
    "Chinedu Okwu",
    "Kemi Adebisi",
    "Ibrahim Musa",
];

const BUSINESS_NAMES: [&str; 5] = [
    "Lagos Trading Co.",
    "Northern Logistics",
    "Tech Solutions Ltd",
    "Fashion Hub",
    "Agro Ventures",
];

const NOTIFICATION_TEMPLATES: [(NotificationKind, &str, &str); 4] = [
    (
        NotificationKind::Info,
        "New Transaction",
        "A new high-value transaction has been recorded",
    ),
    (
        NotificationKind::Success,
        "Report Approved",
        "Monthly report has been approved by admin",
    ),
    (
        NotificationKind::Warning,
        "Budget Alert",
        "Monthly budget threshold reached",
    ),
    (
        NotificationKind::Error,
        "Payment Failed",
        "Payment processing failed for transaction",
    ),
];

const REPORT_TYPES: [ReportType; 3] = [ReportType::Monthly, ReportType::Quarterly, ReportType::Annual];

const REPORT_STATUSES: [ReportStatus; 4] = [
    ReportStatus::Pending,
    ReportStatus::Reviewed,
    ReportStatus::Approved,
    ReportStatus::Rejected,
];

/// The corpus loaded when the simulated connection comes up
#[derive(Debug, Clone)]
pub struct InitialData {
    pub transactions: Vec<Transaction>,
    pub users: Vec<User>,
    pub reports: Vec<Report>,
}

/// Synthetic data source
#[derive(Debug)]
pub struct MockGenerator {
    rng: StdRng,
    user_ids: Vec<UserId>,
}

impl MockGenerator {
    /// Reproducible generator
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            user_ids: Vec::new(),
        }
    }

    /// Build the initial corpus: 50 transactions over the trailing 30 days,
    /// 25 users and 10 submitted reports
    ///
    /// Transactions and reports are attributed to the generated users, and
    /// later ticks keep drawing from the same user pool.
    pub fn initial_data(&mut self, now: DateTime<Utc>) -> InitialData {
        let users: Vec<User> = (0..INITIAL_USER_COUNT).map(|i| self.user(i, now)).collect();
        self.user_ids = users.iter().map(|u| u.id).collect();

        let transactions = (0..INITIAL_TRANSACTION_COUNT)
            .map(|i| self.initial_transaction(i, now))
            .collect();

        let reports = (0..INITIAL_REPORT_COUNT).map(|_| self.report(now)).collect();

        InitialData {
            transactions,
            users,
            reports,
        }
    }

    /// One live transaction stamped `now`
    pub fn next_transaction(&mut self, now: DateTime<Utc>) -> Transaction {
        let kind = *pick(&mut self.rng, &TransactionKind::ALL);
        let description_kind = *pick(&mut self.rng, &TransactionKind::ALL);

        Transaction {
            id: TransactionId::from_random_bytes(self.rng.gen()),
            user_id: self.pick_user(),
            kind,
            amount: self.denomination(),
            category: pick(&mut self.rng, &LIVE_CATEGORIES).to_string(),
            item: String::new(),
            description: format!("Real-time {} transaction", description_kind.as_str()),
            date: now,
            place: None,
        }
    }

    /// One notification from the canned templates
    pub fn next_notification(&mut self, now: DateTime<Utc>) -> Notification {
        let index = self.rng.gen_range(0..NOTIFICATION_TEMPLATES.len());
        let (kind, title, message) = NOTIFICATION_TEMPLATES[index];
        Notification::new(
            NotificationId::from_random_bytes(self.rng.gen()),
            kind,
            title,
            message,
            now,
        )
    }

    fn initial_transaction(&mut self, index: usize, now: DateTime<Utc>) -> Transaction {
        let kind = if self.rng.gen_bool(INITIAL_INCOME_PROBABILITY) {
            TransactionKind::Income
        } else {
            TransactionKind::Expenditure
        };

        Transaction {
            id: TransactionId::from_random_bytes(self.rng.gen()),
            user_id: self.pick_user(),
            kind,
            amount: self.denomination(),
            category: pick(&mut self.rng, &INITIAL_CATEGORIES).to_string(),
            item: String::new(),
            description: format!("Transaction {}", index + 1),
            date: self.instant_within(now, Duration::days(HISTORY_DAYS)),
            place: None,
        }
    }

    fn user(&mut self, index: usize, now: DateTime<Utc>) -> User {
        let number = index + 1;
        User {
            id: UserId::from_random_bytes(self.rng.gen()),
            name: format!("{} {}", USER_NAMES[index % USER_NAMES.len()], number),
            business_name: format!(
                "{} {}",
                BUSINESS_NAMES[index % BUSINESS_NAMES.len()],
                number
            ),
            email: format!("user{}@example.com", number),
            role: if index == 0 { Role::Admin } else { Role::User },
            is_active: self.rng.gen_bool(ACTIVE_USER_PROBABILITY),
            last_active: self.instant_within(now, Duration::days(1)),
            joined_at: self.instant_within(now, Duration::days(365)),
        }
    }

    fn report(&mut self, now: DateTime<Utc>) -> Report {
        Report {
            id: ReportId::from_random_bytes(self.rng.gen()),
            user_id: self.pick_user(),
            report_type: *pick(&mut self.rng, &REPORT_TYPES),
            status: *pick(&mut self.rng, &REPORT_STATUSES),
            submitted_at: self.instant_within(now, Duration::days(HISTORY_DAYS)),
            total_revenue: Money::new(self.rng.gen_range(500_000..5_500_000)),
            total_expenses: Money::new(self.rng.gen_range(300_000..3_300_000)),
        }
    }

    fn denomination(&mut self) -> Money {
        Money::new(*pick(&mut self.rng, &DENOMINATIONS))
    }

    fn pick_user(&mut self) -> UserId {
        match self.user_ids.choose(&mut self.rng) {
            Some(id) => *id,
            None => UserId::from_random_bytes(self.rng.gen()),
        }
    }

    /// Uniformly distributed instant in `(now - span, now]`
    fn instant_within(&mut self, now: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
        let span_ms = span.num_milliseconds().max(1);
        now - Duration::milliseconds(self.rng.gen_range(0..span_ms))
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
