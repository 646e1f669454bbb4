use paintsync_core::ConfigError;
use paintsync_fetch::FetchError;
use paintsync_store::{ConnectError, StoreError};
use thiserror::Error;

/// Pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Connect,
    Store,
    Fetch,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Config => "config",
            Self::Connect => "connect",
            Self::Store => "store",
            Self::Fetch => "fetch",
        })
    }
}

/// Any failure that aborts a sync run. Every variant is fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl SyncError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Connect(_) => ErrorKind::Connect,
            Self::Store(_) => ErrorKind::Store,
            Self::Fetch(_) => ErrorKind::Fetch,
        }
    }

    /// Process exit status for this error: 2 config, 3 connect, 4 store,
    /// 5 fetch.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Config => 2,
            ErrorKind::Connect => 3,
            ErrorKind::Store => 4,
            ErrorKind::Fetch => 5,
        }
    }
}
