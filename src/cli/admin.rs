//! Admin overview command

use std::io::Write;

use super::dashboard::SessionArgs;
use crate::config::Settings;
use crate::error::LedgerResult;
use crate::reports::AdminOverview;

/// Print the admin overview, or write it as CSV with `csv`
pub fn handle_admin(settings: &Settings, session: &SessionArgs, csv: bool) -> LedgerResult<()> {
    let session = session.start(settings);
    let data = session.store().snapshot();
    let overview =
        AdminOverview::generate(&data.users, &data.reports, &data.transactions, session.now());

    if csv {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        overview.export_csv(&mut out)?;
        out.flush()?;
    } else {
        print!("{}", overview.format_terminal());
    }
    Ok(())
}
