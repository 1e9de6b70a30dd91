//! YAML Export functionality
//!
//! The JSON export's structure, written as YAML for reading by eye.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::DashboardExport;

/// Export the dashboard as YAML with a short header comment
pub fn export_dashboard_yaml<W: Write>(
    export: &DashboardExport,
    writer: &mut W,
) -> LedgerResult<()> {
    writeln!(writer, "# LedgerPulse Dashboard Export")?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, export).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// Read back a YAML export
pub fn import_dashboard_yaml(yaml: &str) -> LedgerResult<DashboardExport> {
    let export: DashboardExport =
        serde_yaml::from_str(yaml).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}
