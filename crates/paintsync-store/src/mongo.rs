use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use paintsync_core::{DropScope, SkuRecord, StoreSettings};

use crate::error::{ConnectError, StoreError};
use crate::{CatalogStore, DUPLICATE_KEY_CODE, SKU_INDEX_NAME};

/// A session against a `MongoDB` deployment, bound to one database and one
/// target collection.
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<SkuRecord>,
}

impl MongoStore {
    /// Open a session from resolved settings and verify the server answers.
    ///
    /// The dial timeout bounds both socket connect and server selection, so an
    /// unreachable host fails within roughly that window.
    ///
    /// # Errors
    ///
    /// - [`ConnectError::InvalidUrl`] if the connection URL cannot be parsed.
    /// - [`ConnectError::Unreachable`] if the `ping` command does not succeed
    ///   within the dial timeout.
    pub async fn connect(settings: &StoreSettings) -> Result<Self, ConnectError> {
        let url = settings.connection_url();
        let invalid_url = |source| ConnectError::InvalidUrl {
            url: settings.redacted_url(),
            source,
        };

        let mut options = ClientOptions::parse(url.as_str())
            .await
            .map_err(invalid_url)?;
        options.connect_timeout = Some(settings.dial_timeout);
        options.server_selection_timeout = Some(settings.dial_timeout);
        options.app_name = Some("paintsync".to_string());
        let client = Client::with_options(options).map_err(invalid_url)?;

        let database = client.database(&settings.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| ConnectError::Unreachable {
                host: format!("{}:{}", settings.hostname, settings.port),
                timeout_secs: settings.dial_timeout.as_secs(),
                source,
            })?;

        tracing::info!(url = %settings.redacted_url(), "connected to store");

        let collection = database.collection::<SkuRecord>(&settings.collection);
        Ok(Self {
            client,
            database,
            collection,
        })
    }

    /// End the session, waiting for in-flight operations to finish.
    pub async fn close(self) {
        self.client.shutdown().await;
    }
}

#[async_trait]
impl CatalogStore for MongoStore {
    fn database_name(&self) -> &str {
        self.database.name()
    }

    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn drop_target(&self, scope: DropScope) -> Result<(), StoreError> {
        let (name, result) = match scope {
            DropScope::Database => (self.database_name(), self.database.drop().await),
            DropScope::Collection => (self.collection_name(), self.collection.drop().await),
        };
        result.map_err(|source| StoreError::Drop {
            scope,
            name: name.to_string(),
            source,
        })?;
        tracing::debug!(%scope, dropped = name, "drop complete");
        Ok(())
    }

    async fn ensure_sku_index(&self) -> Result<(), StoreError> {
        let options = IndexOptions::builder()
            .name(SKU_INDEX_NAME.to_string())
            .unique(true)
            .sparse(true)
            .background(true)
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "id": 1, "title": 1 })
            .options(options)
            .build();

        self.collection
            .create_index(model)
            .await
            .map_err(|source| StoreError::CreateIndex {
                collection: self.collection_name().to_string(),
                source,
            })?;
        Ok(())
    }

    async fn insert_records(&self, records: &[SkuRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        match self.collection.insert_many(records).await {
            Ok(result) => Ok(result.inserted_ids.len()),
            Err(source) => match duplicate_key_position(&source) {
                Some(position) => {
                    let rejected = records.get(position);
                    Err(StoreError::DuplicateKey {
                        collection: self.collection_name().to_string(),
                        position,
                        id: rejected.and_then(|r| r.id.clone()),
                        title: rejected.and_then(|r| r.title.clone()),
                    })
                }
                None => Err(StoreError::Insert {
                    collection: self.collection_name().to_string(),
                    source,
                }),
            },
        }
    }

    async fn count_records(&self) -> Result<u64, StoreError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|source| self.read_error(source))
    }

    async fn list_records(&self) -> Result<Vec<SkuRecord>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|source| self.read_error(source))?;
        cursor
            .try_collect()
            .await
            .map_err(|source| self.read_error(source))
    }
}

impl MongoStore {
    fn read_error(&self, source: MongoError) -> StoreError {
        StoreError::Read {
            collection: self.collection_name().to_string(),
            source,
        }
    }
}

/// Batch position of the record rejected by a unique index, if `err` is a
/// duplicate key failure.
fn duplicate_key_position(err: &MongoError) -> Option<usize> {
    match err.kind.as_ref() {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()?
            .iter()
            .find(|e| e.code == DUPLICATE_KEY_CODE)
            .map(|e| e.index),
        _ => None,
    }
}
