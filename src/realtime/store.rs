//! Realtime data store
//!
//! Owns the live transaction list, users, reports and notifications behind a
//! simulated connection. Time only moves when `poll` is called: each call
//! fires every timer that has come due on the injected clock, oldest first,
//! so a late poll catches up on the ticks it missed.
//!
//! Every transaction mutation recomputes the summary, releases the state lock
//! and then publishes the new list on `Channel::Transactions` and the summary
//! on `Channel::Analytics`. Subscribers therefore always observe committed
//! state and may call back into the store.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::clock::Clock;
use super::fanout::{Fanout, Subscription};
use super::generator::MockGenerator;
use crate::analytics::{growth_rate, in_window, percent_change, KindTotals, TimeRange, Window};
use crate::config::RealtimeSettings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Money, Notification, NotificationId, Report, Transaction, TransactionId, TransactionUpdate,
    User,
};

/// Window used for the user sign-up growth figure
const SIGNUP_WINDOW_DAYS: i64 = 30;

/// State of the simulated connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// Channels the store publishes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Carries the full transaction list after each change
    Transactions,
    /// Carries the recomputed `StoreSummary`
    Analytics,
    /// Carries the notification list after each change
    Notifications,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Self::Transactions, Self::Analytics, Self::Notifications];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Analytics => "analytics",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload delivered to store subscribers
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Transactions(Arc<Vec<Transaction>>),
    Analytics(StoreSummary),
    Notifications(Arc<Vec<Notification>>),
}

/// Platform-wide headline figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub active_users: usize,
    pub pending_reports: usize,
    /// Month-over-month revenue change in percent
    pub revenue_growth: f64,
    /// Sign-ups in the trailing 30 days against the 30 days before, in percent
    pub user_growth: f64,
}

impl StoreSummary {
    /// Recompute from scratch
    pub fn of(data: &StoreData, now: DateTime<Utc>) -> Self {
        let totals = KindTotals::of(&data.transactions);

        let range = TimeRange::Month;
        let current = KindTotals::of(in_window(&data.transactions, &range.window(now)));
        let previous = KindTotals::of(in_window(&data.transactions, &range.previous_window(now)));

        let recent_start = now - Duration::days(SIGNUP_WINDOW_DAYS);
        let recent = Window::new(recent_start, now);
        let prior = Window::new(
            recent_start - Duration::days(SIGNUP_WINDOW_DAYS),
            recent_start - Duration::nanoseconds(1),
        );
        let signups = |window: &Window| {
            data.users
                .iter()
                .filter(|u| window.contains(&u.joined_at))
                .count() as f64
        };

        Self {
            total_revenue: totals.revenue,
            total_expenses: totals.expenses,
            active_users: data.users.iter().filter(|u| u.is_active).count(),
            pending_reports: data.reports.iter().filter(|r| r.is_pending()).count(),
            revenue_growth: growth_rate(current.revenue, previous.revenue),
            user_growth: percent_change(signups(&recent), signups(&prior)),
        }
    }
}

/// Immutable copy of everything the store holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    /// Most recently ingested first
    pub transactions: Vec<Transaction>,
    pub users: Vec<User>,
    pub reports: Vec<Report>,
    /// Newest first
    pub notifications: Vec<Notification>,
    pub summary: StoreSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Handshake,
    Transaction,
    Notification,
}

#[derive(Debug, Clone, Copy, Default)]
struct Timers {
    handshake: Option<DateTime<Utc>>,
    transaction: Option<DateTime<Utc>>,
    notification: Option<DateTime<Utc>>,
}

impl Timers {
    /// Earliest timer due at or before `now`; ties go to the handshake
    fn next_due(&self, now: DateTime<Utc>) -> Option<(Timer, DateTime<Utc>)> {
        [
            (Timer::Handshake, self.handshake),
            (Timer::Transaction, self.transaction),
            (Timer::Notification, self.notification),
        ]
        .into_iter()
        .filter_map(|(timer, at)| at.map(|at| (timer, at)))
        .filter(|(_, at)| *at <= now)
        .min_by_key(|(_, at)| *at)
    }

    fn stop(&mut self) {
        *self = Self::default();
    }

    fn is_running(&self) -> bool {
        self.handshake.is_some() || self.transaction.is_some() || self.notification.is_some()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    status: ConnectionStatus,
    data: StoreData,
    timers: Timers,
}

/// Live dashboard state fed by a simulated connection
pub struct RealtimeStore {
    clock: Arc<dyn Clock>,
    settings: RealtimeSettings,
    generator: Mutex<MockGenerator>,
    state: Mutex<StoreState>,
    fanout: Fanout<StoreEvent>,
}

impl RealtimeStore {
    pub fn new(clock: Arc<dyn Clock>, generator: MockGenerator, settings: RealtimeSettings) -> Self {
        Self {
            clock,
            settings,
            generator: Mutex::new(generator),
            state: Mutex::new(StoreState::default()),
            fanout: Fanout::new(),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn settings(&self) -> &RealtimeSettings {
        &self.settings
    }

    /// Start the simulated handshake
    ///
    /// No-op while already connecting or connected.
    pub fn connect(&self) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        match state.status {
            ConnectionStatus::Connecting | ConnectionStatus::Connected => {
                tracing::debug!(status = %state.status, "connect ignored");
            }
            ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                state.status = ConnectionStatus::Connecting;
                state.timers.stop();
                state.timers.handshake = Some(now + self.settings.handshake_delay());
                tracing::info!("connecting to realtime feed");
            }
        }
    }

    /// Fire every timer due at the clock's current instant
    ///
    /// Returns the number of timers fired.
    pub fn poll(&self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        loop {
            let due = self.state.lock().timers.next_due(now);
            let Some((timer, at)) = due else {
                break;
            };

            match timer {
                Timer::Handshake => self.complete_handshake(at),
                Timer::Transaction => self.transaction_tick(at),
                Timer::Notification => self.notification_tick(at),
            }
            fired += 1;
        }

        fired
    }

    /// Stop all timers, disconnect and drop every subscriber
    ///
    /// The data collected so far stays readable through `snapshot`.
    pub fn dispose(&self) {
        {
            let mut state = self.state.lock();
            state.timers.stop();
            state.status = ConnectionStatus::Disconnected;
        }
        self.fanout.clear();
        tracing::info!("realtime store disposed");
    }

    /// Put the connection into the error state and stop its timers
    pub fn mark_error(&self, reason: &str) {
        {
            let mut state = self.state.lock();
            state.timers.stop();
            state.status = ConnectionStatus::Error;
        }
        tracing::error!(reason, "realtime connection failed");
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.lock().status
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Whether any timer is still scheduled
    pub fn is_running(&self) -> bool {
        self.state.lock().timers.is_running()
    }

    /// Register `callback` on `channel`
    pub fn subscribe<F>(&self, channel: Channel, callback: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.fanout.subscribe(channel.as_str(), callback)
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.fanout.subscriber_count(channel.as_str())
    }

    /// Outbound event hook; only logged, there is no backend to send to
    pub fn emit(&self, event: &str, payload: &serde_json::Value) {
        tracing::debug!(event, %payload, "emit");
    }

    /// Copy of the full store state
    pub fn snapshot(&self) -> StoreData {
        self.state.lock().data.clone()
    }

    /// Copy of the transaction list, most recently ingested first
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().data.transactions.clone()
    }

    pub fn summary(&self) -> StoreSummary {
        self.state.lock().data.summary.clone()
    }

    /// Prepend `txn`, keeping at most `max_transactions`
    ///
    /// Entry point for the tick and for any push transport.
    pub fn ingest_transaction(&self, txn: Transaction) {
        let now = self.clock.now();
        let changed = {
            let mut state = self.state.lock();
            prepend_capped(
                &mut state.data.transactions,
                txn,
                self.settings.max_transactions,
            );
            TransactionsChanged::commit(&mut state, now)
        };
        self.publish_transactions(changed);
    }

    /// Validate and ingest a transaction
    pub fn add_transaction(&self, txn: Transaction) -> LedgerResult<Transaction> {
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        tracing::debug!(id = %txn.id, "adding transaction");
        self.ingest_transaction(txn.clone());
        Ok(txn)
    }

    /// Apply `update` to an existing transaction
    pub fn update_transaction(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> LedgerResult<Transaction> {
        let now = self.clock.now();
        let (updated, changed) = {
            let mut state = self.state.lock();
            let slot = state
                .data
                .transactions
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

            let mut updated = slot.clone();
            updated.apply(update);
            updated
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;

            *slot = updated.clone();
            (updated, TransactionsChanged::commit(&mut state, now))
        };
        self.publish_transactions(changed);
        Ok(updated)
    }

    /// Remove a transaction, returning it
    pub fn delete_transaction(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let now = self.clock.now();
        let (removed, changed) = {
            let mut state = self.state.lock();
            let index = state
                .data
                .transactions
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
            let removed = state.data.transactions.remove(index);
            (removed, TransactionsChanged::commit(&mut state, now))
        };
        self.publish_transactions(changed);
        Ok(removed)
    }

    /// Copy of the notification list, newest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().data.notifications.clone()
    }

    pub fn mark_notification_as_read(&self, id: NotificationId) -> LedgerResult<()> {
        let notifications = {
            let mut state = self.state.lock();
            state
                .data
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| LedgerError::notification_not_found(id.to_string()))?
                .mark_read();
            Arc::new(state.data.notifications.clone())
        };
        self.publish_notifications(notifications);
        Ok(())
    }

    pub fn clear_all_notifications(&self) {
        let notifications = {
            let mut state = self.state.lock();
            state.data.notifications.clear();
            Arc::new(Vec::new())
        };
        self.publish_notifications(notifications);
    }

    pub fn unread_count(&self) -> usize {
        self.state
            .lock()
            .data
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    fn complete_handshake(&self, at: DateTime<Utc>) {
        let initial = self.generator.lock().initial_data(at);
        let cap = self.settings.max_transactions;
        let transaction_interval = tick_interval(self.settings.transaction_interval());
        let notification_interval = tick_interval(self.settings.notification_interval());

        let changed = {
            let mut state = self.state.lock();
            state.status = ConnectionStatus::Connected;
            state.timers.handshake = None;
            state.timers.transaction = Some(at + transaction_interval);
            state.timers.notification = Some(at + notification_interval);

            state.data.transactions = initial.transactions;
            state.data.transactions.truncate(cap);
            state.data.users = initial.users;
            state.data.reports = initial.reports;
            TransactionsChanged::commit(&mut state, at)
        };

        tracing::info!(at = %at, "connected to realtime feed");
        self.publish_transactions(changed);
    }

    fn transaction_tick(&self, at: DateTime<Utc>) {
        let txn = self.generator.lock().next_transaction(at);
        let cap = self.settings.max_transactions;
        let interval = tick_interval(self.settings.transaction_interval());

        tracing::debug!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction tick");

        let changed = {
            let mut state = self.state.lock();
            state.timers.transaction = Some(at + interval);
            prepend_capped(&mut state.data.transactions, txn, cap);
            TransactionsChanged::commit(&mut state, at)
        };
        self.publish_transactions(changed);
    }

    fn notification_tick(&self, at: DateTime<Utc>) {
        let notification = self.generator.lock().next_notification(at);
        let cap = self.settings.max_notifications;
        let interval = tick_interval(self.settings.notification_interval());

        tracing::debug!(title = %notification.title, "notification tick");

        let notifications = {
            let mut state = self.state.lock();
            state.timers.notification = Some(at + interval);
            prepend_capped(&mut state.data.notifications, notification, cap);
            Arc::new(state.data.notifications.clone())
        };
        self.publish_notifications(notifications);
    }

    /// Runs with the state lock released
    fn publish_transactions(&self, changed: TransactionsChanged) {
        self.fanout.notify(
            Channel::Transactions.as_str(),
            &StoreEvent::Transactions(changed.transactions),
        );
        self.fanout.notify(
            Channel::Analytics.as_str(),
            &StoreEvent::Analytics(changed.summary),
        );
    }

    fn publish_notifications(&self, notifications: Arc<Vec<Notification>>) {
        self.fanout.notify(
            Channel::Notifications.as_str(),
            &StoreEvent::Notifications(notifications),
        );
    }
}

/// Payloads captured under the lock after a transaction mutation
struct TransactionsChanged {
    transactions: Arc<Vec<Transaction>>,
    summary: StoreSummary,
}

impl TransactionsChanged {
    /// Refresh the stored summary and capture what subscribers will see
    fn commit(state: &mut StoreState, now: DateTime<Utc>) -> Self {
        state.data.summary = StoreSummary::of(&state.data, now);
        Self {
            transactions: Arc::new(state.data.transactions.clone()),
            summary: state.data.summary.clone(),
        }
    }
}

impl fmt::Debug for RealtimeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RealtimeStore")
            .field("status", &state.status)
            .field("transactions", &state.data.transactions.len())
            .field("notifications", &state.data.notifications.len())
            .field("fanout", &self.fanout)
            .finish()
    }
}

fn prepend_capped<T>(items: &mut Vec<T>, item: T, cap: usize) {
    items.insert(0, item);
    items.truncate(cap);
}

/// Zero-length intervals would make `poll` spin forever
fn tick_interval(interval: Duration) -> Duration {
    interval.max(Duration::milliseconds(1))
}
