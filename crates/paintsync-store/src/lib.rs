//! Persistence for flattened catalog records.
//!
//! [`CatalogStore`] is the refresh contract used by the sync pipeline:
//! drop, ensure the unique SKU index, bulk insert. [`MongoStore`] talks to a
//! real `MongoDB` deployment; [`MemoryStore`] keeps the same semantics
//! in-process.

pub mod error;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use paintsync_core::{DropScope, SkuRecord};

pub use error::{ConnectError, StoreError};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Name of the unique (`id`, `title`) index created on the target collection.
pub const SKU_INDEX_NAME: &str = "id_title_unique";

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Database holding the target collection.
    fn database_name(&self) -> &str;

    /// Collection that receives the SKU records.
    fn collection_name(&self) -> &str;

    /// Destroy the target database or collection.
    async fn drop_target(&self, scope: DropScope) -> Result<(), StoreError>;

    /// Create the unique, sparse, background index on (`id`, `title`).
    async fn ensure_sku_index(&self) -> Result<(), StoreError>;

    /// Insert `records` in order as one batch. Stops at the first failing
    /// record; records before it stay persisted. Returns the inserted count.
    async fn insert_records(&self, records: &[SkuRecord]) -> Result<usize, StoreError>;

    async fn count_records(&self) -> Result<u64, StoreError>;

    /// All records in the target collection, in insertion order.
    async fn list_records(&self) -> Result<Vec<SkuRecord>, StoreError>;
}
