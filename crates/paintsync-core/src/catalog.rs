//! Catalog document types and the envelope → SKU flattening step.
//!
//! Field names follow the vendor JSON (`camelCase`). SKU fields are stored
//! exactly as received: absent fields stay absent in the persisted document.

use serde::{Deserialize, Deserializer, Serialize};

/// One top-level catalog document as returned by a source URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEnvelope {
    #[serde(default)]
    pub custom_limit_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skus: Vec<SkuRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dangerous: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hazardous: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limited_quantity: u8,
    #[serde(default)]
    pub product_id: Option<String>,
}

/// A single sellable variant, the unit persisted in the store.
///
/// Identity is the (`id`, `title`) pair; see [`SkuRecord::identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Price exactly as the vendor returns it, e.g. `"4.55"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dangerous: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl SkuRecord {
    /// The deduplication key, or `None` when either half is missing. Records
    /// without a full key are not covered by the sparse unique index.
    #[must_use]
    pub fn identity(&self) -> Option<(&str, &str)> {
        Some((self.id.as_deref()?, self.title.as_deref()?))
    }
}

/// Concatenate every envelope's SKU list, preserving envelope order and then
/// in-envelope order.
#[must_use]
pub fn flatten_envelopes(envelopes: &[CatalogEnvelope]) -> Vec<SkuRecord> {
    let mut records = Vec::with_capacity(sku_count(envelopes));
    for envelope in envelopes {
        records.extend(envelope.skus.iter().cloned());
    }
    records
}

/// Total number of SKU entries across all envelopes.
#[must_use]
pub fn sku_count(envelopes: &[CatalogEnvelope]) -> usize {
    envelopes.iter().map(|e| e.skus.len()).sum()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
