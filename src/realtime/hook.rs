//! Analytics hook
//!
//! Keeps an `AnalyticsSnapshot` for one time range in sync with a store's
//! transaction list. The snapshot is recomputed whenever the store publishes
//! on `Channel::Transactions` or the range changes.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use super::clock::Clock;
use super::fanout::Subscription;
use super::store::{Channel, RealtimeStore, StoreEvent};
use crate::analytics::{self, AnalyticsSnapshot, TimeRange};
use crate::models::Transaction;

#[derive(Debug)]
struct HookState {
    range: TimeRange,
    transactions: Arc<Vec<Transaction>>,
    analytics: AnalyticsSnapshot,
    loading_until: Option<DateTime<Utc>>,
}

impl HookState {
    fn recompute(&mut self, now: DateTime<Utc>) {
        self.analytics = analytics::compute(&self.transactions, self.range, now);
    }
}

/// Live analytics view over a `RealtimeStore`
///
/// Detaches from the store when dropped.
pub struct AnalyticsHook {
    clock: Arc<dyn Clock>,
    refresh_delay: Duration,
    state: Arc<Mutex<HookState>>,
    subscription: Subscription,
}

impl AnalyticsHook {
    /// Subscribe to `store` and compute the first snapshot immediately
    pub fn attach(store: &RealtimeStore, range: TimeRange) -> Self {
        let clock = Arc::clone(store.clock());
        let state = Arc::new(Mutex::new(HookState {
            range,
            transactions: Arc::new(Vec::new()),
            analytics: AnalyticsSnapshot::empty(range),
            loading_until: None,
        }));

        // Subscribe before seeding so nothing published in between is lost
        let subscription = {
            let state = Arc::clone(&state);
            let clock = Arc::clone(&clock);
            store.subscribe(Channel::Transactions, move |event| {
                if let StoreEvent::Transactions(transactions) = event {
                    let mut state = state.lock();
                    state.transactions = Arc::clone(transactions);
                    state.recompute(clock.now());
                }
            })
        };

        {
            let mut state = state.lock();
            state.transactions = Arc::new(store.transactions());
            state.recompute(clock.now());
        }

        tracing::debug!(range = %range, "analytics hook attached");

        Self {
            clock,
            refresh_delay: store.settings().refresh_delay(),
            state,
            subscription,
        }
    }

    /// The latest snapshot
    pub fn analytics(&self) -> AnalyticsSnapshot {
        self.state.lock().analytics.clone()
    }

    /// True until the refresh delay started by `refresh` has elapsed
    pub fn loading(&self) -> bool {
        let now = self.clock.now();
        self.state
            .lock()
            .loading_until
            .is_some_and(|until| now < until)
    }

    /// Enter the loading state for the refresh delay; data is left as is
    pub fn refresh(&self) {
        let until = self.clock.now() + self.refresh_delay;
        self.state.lock().loading_until = Some(until);
    }

    pub fn time_range(&self) -> TimeRange {
        self.state.lock().range
    }

    /// Switch range and recompute synchronously
    pub fn set_time_range(&self, range: TimeRange) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        if state.range != range {
            state.range = range;
            state.recompute(now);
        }
    }

    /// Stop following the store; the last snapshot stays readable
    pub fn detach(&self) {
        self.subscription.unsubscribe();
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }
}

impl Drop for AnalyticsHook {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl std::fmt::Debug for AnalyticsHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsHook")
            .field("state", &self.state)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RealtimeSettings;
    use crate::realtime::clock::ManualClock;
    use crate::realtime::generator::MockGenerator;
    use chrono::TimeZone;

    fn connected_store() -> (RealtimeStore, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap());
        let store = RealtimeStore::new(
            Arc::new(clock.clone()),
            MockGenerator::with_seed(5),
            RealtimeSettings::default(),
        );
        store.connect();
        clock.advance(Duration::seconds(1));
        store.poll();
        (store, clock)
    }

    #[test]
    fn test_attach_computes_immediately() {
        let (store, clock) = connected_store();
        let hook = AnalyticsHook::attach(&store, TimeRange::Month);

        let expected = analytics::compute(&store.transactions(), TimeRange::Month, clock.now());
        assert_eq!(hook.analytics(), expected);
        assert!(!hook.loading());
        assert!(hook.is_attached());
    }

    #[test]
    fn test_follows_store_updates() {
        let (store, clock) = connected_store();
        let hook = AnalyticsHook::attach(&store, TimeRange::Today);

        clock.advance(Duration::seconds(5));
        store.poll();

        let expected = analytics::compute(&store.transactions(), TimeRange::Today, clock.now());
        assert_eq!(hook.analytics(), expected);
        assert_eq!(
            hook.analytics().recent_transactions[0].id,
            store.transactions()[0].id
        );
    }

    #[test]
    fn test_set_time_range_recomputes() {
        let (store, clock) = connected_store();
        let hook = AnalyticsHook::attach(&store, TimeRange::Month);

        hook.set_time_range(TimeRange::Year);
        assert_eq!(hook.time_range(), TimeRange::Year);
        assert_eq!(hook.analytics().time_range, TimeRange::Year);
        assert_eq!(
            hook.analytics(),
            analytics::compute(&store.transactions(), TimeRange::Year, clock.now())
        );
    }

    #[test]
    fn test_refresh_loading_window() {
        let (store, clock) = connected_store();
        let hook = AnalyticsHook::attach(&store, TimeRange::Month);
        let before = hook.analytics();

        hook.refresh();
        assert!(hook.loading());
        assert_eq!(hook.analytics(), before);

        clock.advance(Duration::milliseconds(499));
        assert!(hook.loading());
        clock.advance(Duration::milliseconds(1));
        assert!(!hook.loading());
    }

    #[test]
    fn test_detach_and_drop_unsubscribe() {
        let (store, clock) = connected_store();
        let hook = AnalyticsHook::attach(&store, TimeRange::Month);
        let other = AnalyticsHook::attach(&store, TimeRange::Week);
        assert_eq!(store.subscriber_count(Channel::Transactions), 2);

        hook.detach();
        let frozen = hook.analytics();
        clock.advance(Duration::seconds(5));
        store.poll();
        assert_eq!(hook.analytics(), frozen);

        drop(other);
        assert_eq!(store.subscriber_count(Channel::Transactions), 0);
    }
}
