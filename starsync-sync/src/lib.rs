//! # starsync-sync
//!
//! Star/table reconciliation and the fetch → reconcile pipeline.
//!
//! Call [`reconcile`] with an already fetched star list, or
//! [`pipeline::run`] to fetch and reconcile in one go.

pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use error::{ReconcileError, SyncError};
pub use reconcile::{reconcile, ReconcileOptions, ReconcileReport, RowWarning, SyncAction};
