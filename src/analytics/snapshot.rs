//! Derived analytics records
//!
//! A snapshot is computed, handed out and dropped; nothing in the crate
//! mutates one after `compute` returns it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::window::TimeRange;
use crate::models::{Money, Transaction};

/// A category's share of the aggregated amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: Money,
    pub percentage: f64,
}

/// Revenue/expense totals for one bucket of a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Display label ("Mar 05" for days, "Mar 2025" for months)
    pub label: String,
    /// First calendar day of the bucket
    pub start: NaiveDate,
    pub revenue: Money,
    pub expenses: Money,
    pub profit: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Success,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// A threshold crossing worth surfacing on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    /// The figure that triggered the alert
    pub value: f64,
}

impl Alert {
    pub fn warning(message: impl Into<String>, value: f64) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
            value,
        }
    }

    pub fn success(message: impl Into<String>, value: f64) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
            value,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({:.1})", self.kind, self.message, self.value)
    }
}

/// Point-in-time analytics for one time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub time_range: TimeRange,
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub profit_margin: f64,
    pub transaction_count: usize,
    pub average_transaction_value: f64,
    pub revenue_growth: f64,
    pub expense_growth: f64,
    pub top_categories: Vec<CategoryTotal>,
    pub daily_trends: Vec<TrendPoint>,
    pub monthly_trends: Vec<TrendPoint>,
    pub recent_transactions: Vec<Transaction>,
    pub alerts: Vec<Alert>,
}

impl AnalyticsSnapshot {
    /// A zeroed snapshot: every figure 0, every series empty
    pub fn empty(time_range: TimeRange) -> Self {
        Self {
            time_range,
            total_revenue: Money::zero(),
            total_expenses: Money::zero(),
            net_profit: Money::zero(),
            profit_margin: 0.0,
            transaction_count: 0,
            average_transaction_value: 0.0,
            revenue_growth: 0.0,
            expense_growth: 0.0,
            top_categories: Vec::new(),
            daily_trends: Vec::new(),
            monthly_trends: Vec::new(),
            recent_transactions: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}
