//! `starsync stars` — list the user's stars without touching the table.

use anyhow::{Context, Result};
use clap::Args;
use starsync_core::{config, StarRecord};
use tabled::{settings::Style, Table, Tabled};

use super::SourceArgs;

const DESCRIPTION_WIDTH: usize = 60;

/// Arguments for `starsync stars`.
#[derive(Args, Debug)]
pub struct StarsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct StarTableRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "url")]
    url: String,
    #[tabled(rename = "description")]
    description: String,
}

impl StarsArgs {
    pub fn run(self) -> Result<()> {
        let cfg = config::load_stars(self.source.config.as_deref())
            .context("failed to load configuration")?;
        let github = &cfg.github;
        let fetcher = self.source.fetcher(github, cfg.sync.timeout)?;

        let stars = fetcher
            .fetch_stars(&github.username)
            .with_context(|| format!("failed to retrieve stars for '{}'", github.username))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stars)?);
            return Ok(());
        }

        if stars.is_empty() {
            println!("No stars for '{}'.", github.username);
            return Ok(());
        }
        println!("{}", render_table(&stars));
        println!("{} stars", stars.len());
        Ok(())
    }
}

fn render_table(stars: &[StarRecord]) -> String {
    let rows = stars.iter().map(|s| StarTableRow {
        name: s.name.clone(),
        url: s.url.clone(),
        description: truncate(&s.description, DESCRIPTION_WIDTH),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
