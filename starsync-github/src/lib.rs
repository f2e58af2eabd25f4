//! # starsync-github
//!
//! Fetches a user's starred repositories from the GitHub GraphQL API.
//!
//! [`GitHubClient`] fetches one page at a time; [`fetch_all_stars`] walks the
//! cursor until the API reports no further pages. [`CachedFetcher`] wraps any
//! [`StarFetcher`] with a local JSON snapshot.

pub mod cache;
pub mod client;
pub mod error;
pub mod fetch;

pub use cache::CachedFetcher;
pub use client::GitHubClient;
pub use error::{CacheError, FetchError};
pub use fetch::{fetch_all_stars, PagedFetcher, StarFetcher, StarPage, StarPageSource, PAGE_SIZE};
