//! JSON Export functionality
//!
//! Exports the dashboard (analytics snapshot, store summary and the live
//! transaction list) as JSON with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::analytics::AnalyticsSnapshot;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Transaction;
use crate::realtime::{StoreData, StoreSummary};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full dashboard export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub analytics: AnalyticsSnapshot,

    pub summary: StoreSummary,

    /// Most recently ingested first
    pub transactions: Vec<Transaction>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub user_count: usize,
    pub report_count: usize,
    pub earliest_transaction: Option<DateTime<Utc>>,
    pub latest_transaction: Option<DateTime<Utc>>,
}

impl DashboardExport {
    pub fn new(data: &StoreData, analytics: AnalyticsSnapshot, exported_at: DateTime<Utc>) -> Self {
        let metadata = ExportMetadata {
            transaction_count: data.transactions.len(),
            user_count: data.users.len(),
            report_count: data.reports.len(),
            earliest_transaction: data.transactions.iter().map(|t| t.date).min(),
            latest_transaction: data.transactions.iter().map(|t| t.date).max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            analytics,
            summary: data.summary.clone(),
            transactions: data.transactions.clone(),
            metadata,
        }
    }

    /// Check the schema major version and the metadata counts
    pub fn validate(&self) -> Result<(), String> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.schema_version) != major(EXPORT_SCHEMA_VERSION) {
            return Err(format!(
                "Incompatible schema version {} (expected {})",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }
        if self.metadata.transaction_count != self.transactions.len() {
            return Err(format!(
                "Metadata lists {} transactions but the export holds {}",
                self.metadata.transaction_count,
                self.transactions.len()
            ));
        }
        Ok(())
    }
}

/// Export the dashboard as pretty-printed JSON
pub fn export_dashboard_json<W: Write>(
    export: &DashboardExport,
    writer: &mut W,
) -> LedgerResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}

/// Read back a JSON export
pub fn import_dashboard_json(json: &str) -> LedgerResult<DashboardExport> {
    let export: DashboardExport = serde_json::from_str(json)?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}
