//! Dashboard CLI commands
//!
//! One-shot views over a simulated session (`dashboard`, `notifications`,
//! `transactions`) and `watch`, which follows the live feed on the wall clock.

use clap::{Args, ValueEnum};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::session::Session;
use crate::analytics::{self, TimeRange};
use crate::config::Settings;
use crate::display::{
    format_notifications, format_snapshot, format_store_summary, format_transaction_table,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Transaction;
use crate::realtime::{
    AnalyticsHook, Channel, MockGenerator, RealtimeStore, StoreEvent, SystemClock,
};

/// Output format for data views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Arguments shared by the simulated views
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Seed for reproducible mock data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play this many transaction ticks before rendering
    #[arg(long, default_value = "0")]
    pub ticks: u32,
}

impl SessionArgs {
    pub fn start(&self, settings: &Settings) -> Session {
        let session = Session::start(settings, self.seed);
        session.fast_forward(self.ticks);
        session
    }
}

/// Show the analytics dashboard
pub fn handle_dashboard(
    settings: &Settings,
    session: &SessionArgs,
    range: Option<TimeRange>,
    format: OutputFormat,
) -> LedgerResult<()> {
    let range = range.unwrap_or(settings.default_time_range);
    let session = session.start(settings);
    let store = session.store();
    let snapshot = analytics::compute(&store.transactions(), range, session.now());

    match format {
        OutputFormat::Table => {
            print!("{}", format_store_summary(&store.summary(), &settings.currency_symbol));
            println!();
            print!("{}", format_snapshot(&snapshot, &settings.currency_symbol));
        }
        OutputFormat::Json => print_json(&snapshot)?,
    }

    Ok(())
}

/// List the live transactions, most recently ingested first
pub fn handle_transactions(
    settings: &Settings,
    session: &SessionArgs,
    limit: usize,
    format: OutputFormat,
) -> LedgerResult<()> {
    let session = session.start(settings);
    let mut transactions = session.store().transactions();
    transactions.truncate(limit);

    match format {
        OutputFormat::Table => print!(
            "{}",
            format_transaction_table(
                &transactions,
                &settings.currency_symbol,
                &settings.date_format
            )
        ),
        OutputFormat::Json => print_json(&transactions)?,
    }
    Ok(())
}

/// Show the notification feed, optionally marking everything read
pub fn handle_notifications(
    settings: &Settings,
    session: &SessionArgs,
    mark_read: bool,
    clear: bool,
) -> LedgerResult<()> {
    let session = session.start(settings);
    let store = session.store();

    if mark_read {
        for notification in store.notifications() {
            store.mark_notification_as_read(notification.id)?;
        }
    }
    if clear {
        store.clear_all_notifications();
    }

    print!("{}", format_notifications(&store.notifications()));
    Ok(())
}

/// Follow the live feed on the system clock for `ticks` transactions
pub fn handle_watch(
    settings: &Settings,
    seed: Option<u64>,
    ticks: u32,
    range: Option<TimeRange>,
) -> LedgerResult<()> {
    if ticks == 0 {
        return Err(LedgerError::Validation(
            "watch needs at least one tick".into(),
        ));
    }

    let range = range.unwrap_or(settings.default_time_range);
    let symbol = settings.currency_symbol.as_str();
    let generator = seed.map_or_else(MockGenerator::from_entropy, MockGenerator::with_seed);
    let store = RealtimeStore::new(
        Arc::new(SystemClock),
        generator,
        settings.realtime.clone(),
    );
    let hook = AnalyticsHook::attach(&store, range);

    let queue: Arc<Mutex<VecDeque<Arc<Vec<Transaction>>>>> = Arc::default();
    let _feed = {
        let queue = Arc::clone(&queue);
        store.subscribe(Channel::Transactions, move |event| {
            if let StoreEvent::Transactions(transactions) = event {
                queue.lock().push_back(Arc::clone(transactions));
            }
        })
    };

    println!("Connecting...");
    store.connect();

    let step =
        StdDuration::from_millis((settings.realtime.transaction_interval_ms / 4).clamp(1, 250));
    let mut loaded = false;
    let mut seen = 0u32;
    while seen < ticks {
        store.poll();

        let batches: Vec<_> = queue.lock().drain(..).collect();
        for batch in batches {
            // The first publish is the initial load from the handshake
            if !loaded {
                loaded = true;
                println!("Connected: {} transactions loaded", batch.len());
                continue;
            }
            let Some(latest) = batch.first() else {
                continue;
            };
            seen += 1;
            println!(
                "[{}] {} {} {} ({})",
                latest.date.format("%H:%M:%S"),
                latest.kind,
                latest.amount.format_with_symbol(symbol),
                latest.category,
                latest.description
            );
            if seen >= ticks {
                break;
            }
        }

        if seen < ticks {
            std::thread::sleep(step);
        }
    }

    println!();
    print!("{}", format_store_summary(&store.summary(), symbol));
    print!("{}", format_snapshot(&hook.analytics(), symbol));
    store.dispose();
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> LedgerResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
