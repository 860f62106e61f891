//! Catalog product type and image normalization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ProductId;

/// A catalog product.
///
/// Prices are in the store's base currency. `images` holds upload
/// filenames or absolute URLs, already normalized to a flat list of
/// strings via [`normalize_images`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    /// Available sizes (empty for one-size products).
    pub sizes: Vec<String>,
    pub images: Vec<String>,
    pub featured: bool,
    /// Average review rating, 0-5.
    pub rating: Decimal,
    pub num_reviews: i32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalize an image payload into a flat list of URL/filename strings.
///
/// This is the single normalization point for the historically duck-typed
/// image field. Accepted shapes:
///
/// - `"img.jpg"` - a bare string
/// - `["a.jpg", "b.jpg"]` - an array of strings
/// - `[{"url": "a.jpg"}, ...]` - an array of objects with a `url` field
/// - `{"url": "a.jpg"}` - a single object with a `url` field
///
/// Anything else (including empty strings and objects without `url`)
/// is dropped. Callers store the result and never sniff shapes again.
#[must_use]
pub fn normalize_images(value: &Value) -> Vec<String> {
    fn single(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => match map.get("url") {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    match value {
        Value::Array(items) => items.iter().filter_map(single).collect(),
        other => single(other).into_iter().collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_string() {
        assert_eq!(normalize_images(&json!("shoe.jpg")), vec!["shoe.jpg"]);
    }

    #[test]
    fn test_array_of_strings() {
        assert_eq!(
            normalize_images(&json!(["a.jpg", "b.jpg"])),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn test_array_of_objects() {
        assert_eq!(
            normalize_images(&json!([{"url": "a.jpg"}, {"url": "b.jpg"}])),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn test_mixed_array() {
        assert_eq!(
            normalize_images(&json!(["a.jpg", {"url": "b.jpg"}, 42, ""])),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn test_single_object() {
        assert_eq!(normalize_images(&json!({"url": "a.jpg"})), vec!["a.jpg"]);
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(normalize_images(&json!(null)).is_empty());
        assert!(normalize_images(&json!(42)).is_empty());
        assert!(normalize_images(&json!({"src": "a.jpg"})).is_empty());
        assert!(normalize_images(&json!("")).is_empty());
    }
}
