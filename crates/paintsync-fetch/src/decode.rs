//! Catalog body decoding.
//!
//! Sources answer either with a JSON array of envelopes or with a single
//! envelope object. Both shapes decode to a `Vec<CatalogEnvelope>`.

use paintsync_core::CatalogEnvelope;

/// Decode a catalog response body.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when the body is neither an envelope array
/// nor an envelope object.
pub fn decode_catalog(body: &str) -> Result<Vec<CatalogEnvelope>, serde_json::Error> {
    if body.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<CatalogEnvelope>>(body)
    } else {
        serde_json::from_str::<CatalogEnvelope>(body).map(|envelope| vec![envelope])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_envelope_object() {
        let body = r#"{"skus":[{"id":"A1","title":"Red"},{"id":"A2","title":"Blue"}]}"#;
        let envelopes = decode_catalog(body).unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].skus.len(), 2);
    }

    #[test]
    fn decodes_envelope_array() {
        let body = r#"
            [
                {"productId": "p1", "skus": [{"id": "A1", "title": "Red"}]},
                {"productId": "p2", "skus": []}
            ]"#;
        let envelopes = decode_catalog(body).unwrap();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].product_id.as_deref(), Some("p1"));
        assert!(envelopes[1].skus.is_empty());
    }

    #[test]
    fn decodes_empty_array() {
        assert!(decode_catalog("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_json_body() {
        assert!(decode_catalog("<html>maintenance</html>").is_err());
    }

    #[test]
    fn rejects_wrong_sku_shape() {
        assert!(decode_catalog(r#"{"skus": "A1"}"#).is_err());
    }
}
