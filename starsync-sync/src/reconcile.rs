//! Star/table reconciliation.
//!
//! ## Steps, in order
//!
//! 1. Index stars by URL (last occurrence wins).
//! 2. Index existing rows by URL, skipping empty and duplicate URLs.
//! 3. Add a row for every star whose URL is not in the row index.
//! 4. Fill empty descriptions of indexed rows from their star.
//! 5. If enabled, delete indexed rows whose URL matches no star.
//!
//! The row index from step 2 is a snapshot taken before any write; rows
//! created in step 3 are never revisited by steps 4 and 5.

use std::collections::{HashMap, HashSet};

use starsync_core::{FieldNames, RowId, StarRecord, Table, TableError, TableRow};

use crate::error::ReconcileError;

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Remove rows whose URL matches no current star.
    pub delete_orphans: bool,
    /// Work out every action but perform no writes.
    pub dry_run: bool,
    pub fields: FieldNames,
}

/// A change applied to (or, in dry-run mode, planned for) the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Added { name: String, url: String },
    DescriptionFilled { name: String, url: String },
    Deleted { name: String, url: String },
}

/// A row left alone because its URL cannot key it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowWarning {
    EmptyUrl { row: RowId },
    DuplicateUrl { row: RowId, url: String },
}

/// What a reconciliation did, in the order it did it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub actions: Vec<SyncAction>,
    pub warnings: Vec<RowWarning>,
    pub dry_run: bool,
}

impl ReconcileReport {
    pub fn added(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Added { .. }))
    }

    pub fn filled(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::DescriptionFilled { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Deleted { .. }))
    }

    /// True when the table already matched the stars.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    fn count(&self, pred: impl Fn(&SyncAction) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

/// Bring `table` in line with `stars`.
///
/// The first failing write aborts the run; earlier writes are not undone
/// and are listed in [`ReconcileError::applied`].
pub fn reconcile<T>(
    stars: &[StarRecord],
    table: &mut T,
    options: &ReconcileOptions,
) -> Result<ReconcileReport, ReconcileError>
where
    T: Table + ?Sized,
{
    let mut report = ReconcileReport {
        dry_run: options.dry_run,
        ..ReconcileReport::default()
    };
    match apply(stars, table, options, &mut report) {
        Ok(()) => Ok(report),
        Err(source) => Err(ReconcileError {
            applied: report,
            source,
        }),
    }
}

/// Steps 1 to 5; every action is recorded in `report` right after its write.
fn apply<T>(
    stars: &[StarRecord],
    table: &mut T,
    options: &ReconcileOptions,
    report: &mut ReconcileReport,
) -> Result<(), TableError>
where
    T: Table + ?Sized,
{
    let fields = &options.fields;

    // Step 1: stars by URL.
    let stars_by_url: HashMap<&str, &StarRecord> =
        stars.iter().map(|s| (s.url.as_str(), s)).collect();

    // Step 2: canonical rows by URL, in table order.
    let snapshot = table.rows()?;
    let indexed = index_rows(&snapshot, fields, &mut report.warnings);
    let indexed_urls: HashSet<&str> = indexed.iter().map(|(url, _)| *url).collect();

    // Step 3: add missing rows.
    for star in stars {
        if indexed_urls.contains(star.url.as_str()) {
            continue;
        }
        if !options.dry_run {
            table.create_row(&fields.fields_for(star))?;
        }
        tracing::info!(name = %star.name, url = %star.url, "added new row");
        report.actions.push(SyncAction::Added {
            name: star.name.clone(),
            url: star.url.clone(),
        });
    }

    // Step 4: backfill empty descriptions.
    for (url, row) in &indexed {
        if !row.get_field(&fields.description).is_empty() {
            continue;
        }
        // Unstarred since the row was created; leave it for step 5.
        let Some(star) = stars_by_url.get(url) else {
            continue;
        };
        if star.description.is_empty() {
            continue;
        }
        if !options.dry_run {
            table.set_field(&row.id, &fields.description, &star.description)?;
        }
        tracing::info!(name = %star.name, url = %star.url, "filled missing description");
        report.actions.push(SyncAction::DescriptionFilled {
            name: star.name.clone(),
            url: star.url.clone(),
        });
    }

    // Step 5: delete orphans.
    if options.delete_orphans {
        for (url, row) in &indexed {
            if stars_by_url.contains_key(url) {
                continue;
            }
            if !options.dry_run {
                table.delete_row(&row.id)?;
            }
            let name = row.get_field(&fields.name).to_string();
            tracing::info!(name = %name, url = %url, "deleted row");
            report.actions.push(SyncAction::Deleted {
                name,
                url: url.to_string(),
            });
        }
    }

    Ok(())
}

/// First-seen rows keyed by non-empty URL, in table order.
fn index_rows<'a>(
    rows: &'a [TableRow],
    fields: &FieldNames,
    warnings: &mut Vec<RowWarning>,
) -> Vec<(&'a str, &'a TableRow)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut indexed = Vec::new();
    for row in rows {
        let url = row.get_field(&fields.url);
        if url.is_empty() {
            tracing::warn!(row = %row.id, "skipping row with empty URL");
            warnings.push(RowWarning::EmptyUrl { row: row.id.clone() });
            continue;
        }
        if !seen.insert(url) {
            tracing::warn!(row = %row.id, url, "found duplicate row");
            warnings.push(RowWarning::DuplicateUrl {
                row: row.id.clone(),
                url: url.to_string(),
            });
            continue;
        }
        indexed.push((url, row));
    }
    indexed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
