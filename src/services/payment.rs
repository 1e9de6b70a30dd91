//! Payment simulation
//!
//! Stands in for a card gateway: validates the charge, then declines a fixed
//! share of them at random. A decline is reported as
//! `LedgerError::PaymentDeclined`. An unreachable gateway is a
//! `LedgerError::Transport` and is safe to retry.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::PaymentSettings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, PaymentId, Transaction, TransactionKind, UserId};

/// Category recorded for settled payments
pub const PAYMENT_CATEGORY: &str = "Payments";

/// A settled charge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub id: PaymentId,
    pub amount: Money,
    pub description: String,
    pub processed_at: DateTime<Utc>,
    /// When the funds are expected to clear
    pub settles_at: DateTime<Utc>,
}

impl PaymentReceipt {
    /// The expenditure this payment represents in `user_id`'s ledger
    pub fn to_transaction(&self, user_id: UserId) -> Transaction {
        Transaction::new(
            user_id,
            TransactionKind::Expenditure,
            self.amount,
            PAYMENT_CATEGORY,
            self.processed_at,
        )
        .with_description(self.description.clone())
        .with_item(self.id.to_string())
    }
}

/// Simulated payment gateway
#[derive(Debug)]
pub struct PaymentProcessor<R = StdRng> {
    rng: R,
    decline_probability: f64,
    processing_delay: Duration,
    offline: bool,
}

impl PaymentProcessor<StdRng> {
    pub fn from_settings(settings: &PaymentSettings) -> LedgerResult<Self> {
        Self::with_rng(StdRng::from_entropy(), settings)
    }

    /// Reproducible processor
    pub fn with_seed(seed: u64, settings: &PaymentSettings) -> LedgerResult<Self> {
        Self::with_rng(StdRng::seed_from_u64(seed), settings)
    }
}

impl<R: Rng> PaymentProcessor<R> {
    pub fn with_rng(rng: R, settings: &PaymentSettings) -> LedgerResult<Self> {
        settings.validate()?;
        Ok(Self {
            rng,
            decline_probability: settings.decline_probability,
            processing_delay: settings.processing_delay(),
            offline: settings.offline,
        })
    }

    pub fn decline_probability(&self) -> f64 {
        self.decline_probability
    }

    /// Take the simulated gateway offline, or bring it back
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Charge `amount` for `description`
    ///
    /// Returns `Validation` for a non-positive amount or blank description,
    /// `Transport` while the gateway is offline, and `PaymentDeclined` when
    /// the simulated gateway refuses the charge.
    pub fn process(
        &mut self,
        amount: Money,
        description: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<PaymentReceipt> {
        if !amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Payment amount must be positive, got {}",
                amount
            )));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Payment description is required".into(),
            ));
        }

        if self.offline {
            tracing::warn!(%amount, "payment gateway unreachable");
            return Err(LedgerError::Transport(
                "Payment gateway is unreachable".into(),
            ));
        }

        let id = PaymentId::from_random_bytes(self.rng.gen());
        if self.rng.gen_bool(self.decline_probability) {
            tracing::warn!(payment = %id, %amount, "payment declined");
            return Err(LedgerError::PaymentDeclined {
                reference: id.to_string(),
                amount,
            });
        }

        tracing::info!(payment = %id, %amount, "payment processed");
        Ok(PaymentReceipt {
            id,
            amount,
            description: description.to_string(),
            processed_at: now,
            settles_at: now + self.processing_delay,
        })
    }
}
