//! Catalog refresh orchestration: drop, index, fetch, flatten, load.

pub mod error;
pub mod pipeline;

pub use error::{ErrorKind, SyncError};
pub use pipeline::{preview_catalogs, run_sync, sync_catalogs, SyncReport};
