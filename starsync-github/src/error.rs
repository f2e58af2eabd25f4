//! Error types for starsync-github.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can abort a star fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub answered with a non-200 status.
    #[error("query failed to run by returning status {status}: {query}")]
    Status {
        status: u16,
        /// The request body that was sent (document + variables).
        query: String,
        body: String,
    },

    /// No response was received at all.
    #[error("GitHub request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON we asked for.
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    /// HTTP 200 with a GraphQL `errors` array.
    #[error("GitHub returned errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// `user(login:)` resolved to null.
    #[error("GitHub user `{0}` not found")]
    UserNotFound(String),

    /// `hasNextPage` was true but no `endCursor` came with it.
    #[error("page reported more results but carried no end cursor")]
    MissingCursor,

    #[error("star cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Errors reading or writing the local star snapshot.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed star cache at {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`CacheError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.into(),
        source,
    }
}
