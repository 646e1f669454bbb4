use chrono::{DateTime, Utc};
use paintsync_core::{flatten_envelopes, DropScope, SyncConfig};
use paintsync_fetch::client::DEFAULT_USER_AGENT;
use paintsync_fetch::CatalogClient;
use paintsync_store::{CatalogStore, MongoStore, StoreError};
use uuid::Uuid;

use crate::error::SyncError;

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// `true` when the store was never touched.
    pub dry_run: bool,
    pub sources: usize,
    pub envelopes: usize,
    pub records_flattened: usize,
    pub records_loaded: usize,
}

impl SyncReport {
    fn begin(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            dry_run,
            sources: 0,
            envelopes: 0,
            records_flattened: 0,
            records_loaded: 0,
        }
    }

    fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }
}

/// Run a full refresh against the configured `MongoDB` store.
///
/// The store session is closed whether or not the refresh succeeds.
///
/// # Errors
///
/// Returns [`SyncError::Connect`] if the store cannot be reached, otherwise
/// any error from [`sync_catalogs`].
pub async fn run_sync(config: &SyncConfig) -> Result<SyncReport, SyncError> {
    let client = CatalogClient::new(DEFAULT_USER_AGENT)?;
    let store = MongoStore::connect(&config.store).await?;

    let result = sync_catalogs(config, &store, &client).await;
    store.close().await;
    result
}

/// Drop the target, ensure the unique SKU index, fetch every source in
/// order, flatten, and insert.
///
/// Fail-fast with no compensation: once the drop has happened, a later
/// failure leaves the target empty or partially loaded.
///
/// # Errors
///
/// Returns the first [`SyncError::Store`] or [`SyncError::Fetch`] raised.
pub async fn sync_catalogs<S>(
    config: &SyncConfig,
    store: &S,
    client: &CatalogClient,
) -> Result<SyncReport, SyncError>
where
    S: CatalogStore + ?Sized,
{
    let mut report = SyncReport::begin(false);
    let scope = config.store.drop_scope;
    tracing::info!(
        run_id = %report.run_id,
        database = store.database_name(),
        collection = store.collection_name(),
        sources = config.sources.len(),
        "starting catalog refresh"
    );

    if scope == DropScope::Database {
        tracing::warn!(
            database = store.database_name(),
            "dropping the entire database, not just the target collection"
        );
    }
    store.drop_target(scope).await?;
    store.ensure_sku_index().await?;

    let envelopes = match client.fetch_all(&config.sources).await {
        Ok(envelopes) => envelopes,
        Err(e) => {
            warn_not_reloaded(store, 0);
            return Err(e.into());
        }
    };
    let records = flatten_envelopes(&envelopes);
    report.sources = config.sources.len();
    report.envelopes = envelopes.len();
    report.records_flattened = records.len();

    report.records_loaded = match store.insert_records(&records).await {
        Ok(loaded) => loaded,
        Err(e) => {
            let loaded = match &e {
                StoreError::DuplicateKey { position, .. } => *position,
                _ => 0,
            };
            warn_not_reloaded(store, loaded);
            return Err(e.into());
        }
    };

    let report = report.finish();
    tracing::info!(
        run_id = %report.run_id,
        envelopes = report.envelopes,
        records = report.records_loaded,
        "catalog refresh complete"
    );
    Ok(report)
}

/// Fetch and flatten every source without touching any store.
///
/// # Errors
///
/// Returns the first [`SyncError::Fetch`] raised.
pub async fn preview_catalogs(
    config: &SyncConfig,
    client: &CatalogClient,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::begin(true);
    let envelopes = client.fetch_all(&config.sources).await?;
    let records = flatten_envelopes(&envelopes);

    report.sources = config.sources.len();
    report.envelopes = envelopes.len();
    report.records_flattened = records.len();
    Ok(report.finish())
}

fn warn_not_reloaded<S>(store: &S, loaded: usize)
where
    S: CatalogStore + ?Sized,
{
    tracing::warn!(
        database = store.database_name(),
        collection = store.collection_name(),
        loaded,
        "refresh aborted after drop; target is not fully reloaded"
    );
}
