//! Subcommands and the argument groups they share.

pub mod config;
pub mod stars;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use starsync_core::config::GithubConfig;
use starsync_github::{cache, CachedFetcher, GitHubClient, PagedFetcher, StarFetcher};

/// Where configuration and stars come from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Config file to use instead of ~/.starsync/config.yaml.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Serve stars from ~/.starsync/cache/stars-<user>.json, fetching once if absent.
    #[arg(long)]
    pub cache: bool,

    /// Like --cache, with an explicit snapshot file.
    #[arg(long, value_name = "PATH", conflicts_with = "cache")]
    pub cache_file: Option<PathBuf>,
}

impl SourceArgs {
    /// Build the star fetcher selected by the flags.
    pub fn fetcher(
        &self,
        github: &GithubConfig,
        timeout: std::time::Duration,
    ) -> Result<Box<dyn StarFetcher>> {
        let live = PagedFetcher::new(GitHubClient::new(github.token.clone(), timeout));

        let cache_path = match (&self.cache_file, self.cache) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(
                cache::cache_path(&github.username)
                    .context("could not determine star cache location")?,
            ),
            (None, false) => None,
        };

        let fetcher: Box<dyn StarFetcher> = match cache_path {
            Some(path) => Box::new(CachedFetcher::new(live, path)),
            None => Box::new(live),
        };
        Ok(fetcher)
    }
}
