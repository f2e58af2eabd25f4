//! Fetch → reconcile, the one entry point the CLI calls.

use starsync_core::Table;
use starsync_github::StarFetcher;

use crate::reconcile::{reconcile, ReconcileOptions, ReconcileReport};
use crate::SyncError;

/// Outcome of a full run.
#[derive(Debug)]
pub struct SyncReport {
    pub login: String,
    /// Number of stars retrieved.
    pub stars: usize,
    pub reconcile: ReconcileReport,
}

/// Fetch every star of `login` and reconcile `table` against them.
///
/// A fetch failure leaves the table untouched.
pub fn run<F, T>(
    fetcher: &F,
    login: &str,
    table: &mut T,
    options: &ReconcileOptions,
) -> Result<SyncReport, SyncError>
where
    F: StarFetcher + ?Sized,
    T: Table + ?Sized,
{
    tracing::info!(user = login, "retrieving stars");
    let stars = fetcher.fetch_stars(login)?;

    tracing::info!(stars = stars.len(), dry_run = options.dry_run, "syncing stars to table");
    let report = reconcile(&stars, table, options)?;

    Ok(SyncReport {
        login: login.to_string(),
        stars: stars.len(),
        reconcile: report,
    })
}
