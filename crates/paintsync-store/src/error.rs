use paintsync_core::DropScope;
use thiserror::Error;

/// Failure to open a store session.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("invalid store connection URL {url}: {source}")]
    InvalidUrl {
        /// Connection URL with the password masked.
        url: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("store at {host} unreachable within {timeout_secs}s: {source}")]
    Unreachable {
        host: String,
        timeout_secs: u64,
        #[source]
        source: mongodb::error::Error,
    },
}

/// Failure of a refresh step against an open store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to drop {scope} '{name}': {source}")]
    Drop {
        scope: DropScope,
        name: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("failed to create unique SKU index on '{collection}': {source}")]
    CreateIndex {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error(
        "duplicate SKU (id={id:?}, title={title:?}) at position {position} rejected by '{collection}'"
    )]
    DuplicateKey {
        collection: String,
        /// Index of the rejected record in the batch; every record before it
        /// was inserted.
        position: usize,
        id: Option<String>,
        title: Option<String>,
    },

    #[error("failed to insert into '{collection}': {source}")]
    Insert {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("failed to read '{collection}': {source}")]
    Read {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },
}
