//! Error types for starsync-sync.

use thiserror::Error;

use starsync_core::TableError;
use starsync_github::FetchError;

use crate::reconcile::ReconcileReport;

/// All errors that can abort a sync run.
///
/// Writes already applied before the failure stay applied.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Retrieving the stars failed; the table was not touched.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Reading or writing the destination table failed.
    #[error("table error: {0}")]
    Reconcile(#[from] ReconcileError),
}

impl SyncError {
    /// Actions that reached the table before the run failed.
    pub fn applied(&self) -> Option<&ReconcileReport> {
        match self {
            SyncError::Fetch(_) => None,
            SyncError::Reconcile(e) => Some(&e.applied),
        }
    }
}

/// A reconciliation stopped by a table error.
#[derive(Debug, Error)]
#[error("reconciliation stopped after {} applied change(s)", .applied.actions.len())]
pub struct ReconcileError {
    /// Everything done before the failure. These writes are not undone.
    pub applied: ReconcileReport,
    #[source]
    pub source: TableError,
}
