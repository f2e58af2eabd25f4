//! `starsync sync` — fetch stars and reconcile the Notion table.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use starsync_core::config;
use starsync_notion::NotionTable;
use starsync_sync::{
    pipeline::{self, SyncReport},
    ReconcileOptions, ReconcileReport, RowWarning, SyncAction,
};

use super::SourceArgs;

/// Arguments for `starsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Delete rows whose repository is no longer starred.
    #[arg(long)]
    pub delete: bool,

    /// Show what would change without writing to the table.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let cfg = config::load(self.source.config.as_deref())
            .context("failed to load configuration")?;
        let fetcher = self.source.fetcher(&cfg.github, cfg.sync.timeout)?;

        let mut table = NotionTable::open(
            &cfg.notion.table_url,
            cfg.notion.token.clone(),
            cfg.sync.timeout,
            &cfg.sync.fields.all(),
        )
        .with_context(|| format!("failed to open Notion table '{}'", cfg.notion.table_url))?;

        let options = ReconcileOptions {
            delete_orphans: self.delete || cfg.sync.delete,
            dry_run: self.dry_run,
            fields: cfg.sync.fields.clone(),
        };

        tracing::debug!(
            database = table.database_id(),
            delete = options.delete_orphans,
            dry_run = options.dry_run,
            "starting sync"
        );
        println!("Retrieving stars for GitHub user {}", cfg.github.username);
        let report = match pipeline::run(fetcher.as_ref(), &cfg.github.username, &mut table, &options) {
            Ok(report) => report,
            Err(e) => {
                if let Some(applied) = e.applied() {
                    for line in report_lines(applied) {
                        println!("{line}");
                    }
                }
                return Err(e).with_context(|| format!("sync failed for '{}'", cfg.github.username));
            }
        };

        for line in report_lines(&report.reconcile) {
            println!("{line}");
        }
        println!("{}", summary_line(&report).green());
        Ok(())
    }
}

fn report_lines(report: &ReconcileReport) -> Vec<String> {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let warnings = report.warnings.iter().map(|w| match w {
        RowWarning::EmptyUrl { row } => format!("Warning: skipping row {row} with empty URL"),
        RowWarning::DuplicateUrl { url, .. } => format!("Warning: found duplicate row for {url}"),
    });
    let actions = report.actions.iter().map(|a| match a {
        SyncAction::Added { name, .. } => format!("{prefix}Added new row for {name}"),
        SyncAction::DescriptionFilled { name, .. } => {
            format!("{prefix}Filled missing description for {name}")
        }
        SyncAction::Deleted { name, url } => format!("{prefix}Deleted row for {name} ({url})"),
    });
    warnings.chain(actions).collect()
}

fn summary_line(report: &SyncReport) -> String {
    let r = &report.reconcile;
    let prefix = if r.dry_run { "[dry-run] " } else { "" };
    if r.is_noop() {
        return format!("{prefix}✓ {} stars, table already up to date", report.stars);
    }
    format!(
        "{prefix}✓ {} stars synced ({} added, {} descriptions filled, {} deleted)",
        report.stars,
        r.added(),
        r.filled(),
        r.deleted()
    )
}
