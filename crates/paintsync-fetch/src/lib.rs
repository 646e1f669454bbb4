pub mod client;
pub mod decode;
pub mod error;

pub use client::CatalogClient;
pub use decode::decode_catalog;
pub use error::FetchError;
