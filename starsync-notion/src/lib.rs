//! # starsync-notion
//!
//! A Notion database exposed through the [`starsync_core::Table`] interface.
//!
//! - [`locator`] — database URL / id parsing
//! - [`property`] — Notion property values to and from plain strings
//! - [`client`] — [`NotionTable`], the blocking HTTP transport

pub mod client;
pub mod locator;
pub mod property;

pub use client::NotionTable;
pub use locator::database_id;
pub use property::PropertyKind;
