pub mod catalog;
pub mod config;
mod error;

pub use catalog::{flatten_envelopes, sku_count, CatalogEnvelope, SkuRecord};
pub use config::{
    load_sync_config, parse_sync_config, CatalogSource, DropScope, RawStoreSettings,
    StoreSettings, SyncConfig,
};
pub use error::ConfigError;
