use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use paintsync_core::{DropScope, SkuRecord, StoreSettings};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::CatalogStore;

#[derive(Debug, Default)]
struct MemoryState {
    collections: BTreeMap<String, Vec<SkuRecord>>,
    sku_index: bool,
}

/// In-process [`CatalogStore`] for local runs and tests.
///
/// Models a single database. The unique index is sparse: records missing
/// `id` or `title` are never rejected.
#[derive(Debug)]
pub struct MemoryStore {
    database_name: String,
    collection_name: String,
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database_name: database.into(),
            collection_name: collection.into(),
            state: RwLock::new(MemoryState::default()),
        }
    }

    #[must_use]
    pub fn for_settings(settings: &StoreSettings) -> Self {
        Self::new(&settings.database, &settings.collection)
    }

    /// Replace the contents of any collection in this database, bypassing
    /// the index.
    pub async fn seed_collection(&self, name: &str, records: Vec<SkuRecord>) {
        let mut state = self.state.write().await;
        state.collections.insert(name.to_string(), records);
    }

    /// Contents of an arbitrary collection; empty if it does not exist.
    pub async fn collection_records(&self, name: &str) -> Vec<SkuRecord> {
        let state = self.state.read().await;
        state.collections.get(name).cloned().unwrap_or_default()
    }

    pub async fn collection_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.collections.keys().cloned().collect()
    }

    pub async fn has_sku_index(&self) -> bool {
        self.state.read().await.sku_index
    }
}

fn owned_identity(record: &SkuRecord) -> Option<(String, String)> {
    record
        .identity()
        .map(|(id, title)| (id.to_string(), title.to_string()))
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn drop_target(&self, scope: DropScope) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match scope {
            DropScope::Database => state.collections.clear(),
            DropScope::Collection => {
                state.collections.remove(&self.collection_name);
            }
        }
        state.sku_index = false;
        Ok(())
    }

    async fn ensure_sku_index(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.sku_index {
            return Ok(());
        }

        // Existing duplicates are discarded, keeping the first occurrence.
        if let Some(records) = state.collections.get_mut(&self.collection_name) {
            let before = records.len();
            let mut seen = HashSet::new();
            records.retain(|r| owned_identity(r).is_none_or(|key| seen.insert(key)));
            let discarded = before - records.len();
            if discarded > 0 {
                tracing::warn!(
                    collection = %self.collection_name,
                    discarded,
                    "discarded duplicate SKUs while building index"
                );
            }
        }
        state.sku_index = true;
        Ok(())
    }

    async fn insert_records(&self, records: &[SkuRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.write().await;
        let indexed = state.sku_index;
        let target = state
            .collections
            .entry(self.collection_name.clone())
            .or_default();
        let mut seen: HashSet<(String, String)> = if indexed {
            target.iter().filter_map(owned_identity).collect()
        } else {
            HashSet::new()
        };

        for (position, record) in records.iter().enumerate() {
            if indexed {
                if let Some(key) = owned_identity(record) {
                    if !seen.insert(key) {
                        return Err(StoreError::DuplicateKey {
                            collection: self.collection_name.clone(),
                            position,
                            id: record.id.clone(),
                            title: record.title.clone(),
                        });
                    }
                }
            }
            target.push(record.clone());
        }

        Ok(records.len())
    }

    async fn count_records(&self) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        let count = state
            .collections
            .get(&self.collection_name)
            .map_or(0, Vec::len);
        Ok(count as u64)
    }

    async fn list_records(&self) -> Result<Vec<SkuRecord>, StoreError> {
        Ok(self.collection_records(&self.collection_name).await)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
