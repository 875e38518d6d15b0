//! Wire shapes of GROQ query results.
//!
//! The content store returns loosely typed JSON: any field may be missing,
//! `null`, or of an unexpected type. Every field here is decoded through a
//! [`lenient`] helper that never fails; a bad value becomes "unset" and a
//! bad array element is dropped. Only a non-object document fails to decode.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Query API response envelope.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    /// Query result; `null` when a `[0]` lookup matched nothing.
    #[serde(default)]
    pub result: serde_json::Value,
}

// =============================================================================
// Images
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RawImage {
    #[serde(default, deserialize_with = "lenient::object")]
    pub asset: Option<RawAssetRef>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub crop: Option<RawCrop>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub hotspot: Option<RawHotspot>,
}

#[derive(Debug, Deserialize)]
pub struct RawAssetRef {
    #[serde(rename = "_ref", default, deserialize_with = "lenient::string")]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCrop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawHotspot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RawProductCard {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "_updatedAt", default, deserialize_with = "lenient::string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Option<Decimal>,
    #[serde(rename = "mainImage", default, deserialize_with = "lenient::object")]
    pub main_image: Option<RawImage>,
    #[serde(rename = "shopeeUrl", default, deserialize_with = "lenient::string")]
    pub checkout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "_createdAt", default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(rename = "_updatedAt", default, deserialize_with = "lenient::string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Option<Decimal>,
    #[serde(rename = "shopeeUrl", default, deserialize_with = "lenient::string")]
    pub checkout_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub images: Vec<RawImage>,
    #[serde(rename = "customOptions", default, deserialize_with = "lenient::items")]
    pub custom_options: Vec<RawOptionGroup>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub body: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
pub struct RawOptionGroup {
    #[serde(rename = "groupName", default, deserialize_with = "lenient::string")]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub choices: Vec<String>,
}

// =============================================================================
// Posts
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RawPostCard {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "_updatedAt", default, deserialize_with = "lenient::string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(rename = "mainImage", default, deserialize_with = "lenient::object")]
    pub main_image: Option<RawImage>,
    #[serde(rename = "seoTitle", default, deserialize_with = "lenient::string")]
    pub seo_title: Option<String>,
    #[serde(rename = "seoDescription", default, deserialize_with = "lenient::string")]
    pub seo_description: Option<String>,
    #[serde(rename = "relatedProducts", default, deserialize_with = "lenient::items")]
    pub related_products: Vec<RawProductCard>,
}

#[derive(Debug, Deserialize)]
pub struct RawPost {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "_createdAt", default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(rename = "_updatedAt", default, deserialize_with = "lenient::string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(rename = "mainImage", default, deserialize_with = "lenient::object")]
    pub main_image: Option<RawImage>,
    #[serde(rename = "seoTitle", default, deserialize_with = "lenient::string")]
    pub seo_title: Option<String>,
    #[serde(rename = "seoDescription", default, deserialize_with = "lenient::string")]
    pub seo_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub body: Vec<RawBlock>,
    #[serde(rename = "relatedProducts", default, deserialize_with = "lenient::items")]
    pub related_products: Vec<RawProductCard>,
}

// =============================================================================
// Portable Text
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "_type", default, deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub style: Option<String>,
    #[serde(rename = "listItem", default, deserialize_with = "lenient::string")]
    pub list_item: Option<String>,
    #[serde(rename = "markDefs", default, deserialize_with = "lenient::items")]
    pub mark_defs: Vec<RawMarkDef>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub children: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
pub struct RawMarkDef {
    #[serde(rename = "_key", default, deserialize_with = "lenient::string")]
    pub key: Option<String>,
    #[serde(rename = "_type", default, deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub href: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSpan {
    #[serde(rename = "_type", default, deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub marks: Vec<String>,
}

/// Never-failing field decoders.
pub mod lenient {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Non-blank string, else `None`.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }

    /// Any string including whitespace, else empty.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            _ => String::new(),
        })
    }

    /// Number or numeric string, else `None`.
    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) => parse_decimal(s.trim()),
            _ => None,
        })
    }

    fn parse_decimal(raw: &str) -> Option<Decimal> {
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
    }

    /// Object decoded as `T`, else `None`.
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }

    /// Array with undecodable elements dropped; non-arrays become empty.
    pub fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map_or_else(Vec::new, collect_items))
    }

    /// Decode the elements of a JSON array, dropping those that fail.
    pub fn collect_items<T: DeserializeOwned>(value: Value) -> Vec<T> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wrong_types_become_unset() {
        let raw: RawProductCard = serde_json::from_value(json!({
            "_id": 42,
            "title": ["not", "a", "string"],
            "slug": "   ",
            "price": {"amount": 790},
            "mainImage": "image-abc-1x1-jpg",
            "shopeeUrl": null
        }))
        .unwrap();

        assert!(raw.id.is_none());
        assert!(raw.title.is_none());
        assert!(raw.slug.is_none());
        assert!(raw.price.is_none());
        assert!(raw.main_image.is_none());
        assert!(raw.checkout_url.is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let raw: RawPost = serde_json::from_value(json!({})).unwrap();
        assert!(raw.id.is_none());
        assert!(raw.body.is_empty());
        assert!(raw.related_products.is_empty());
    }

    #[test]
    fn test_price_accepts_numbers_and_numeric_strings() {
        let raw: RawProductCard = serde_json::from_value(json!({"price": 790})).unwrap();
        assert_eq!(raw.price, Some(Decimal::from(790)));

        let raw: RawProductCard = serde_json::from_value(json!({"price": " 1290 "})).unwrap();
        assert_eq!(raw.price, Some(Decimal::from(1290)));

        let raw: RawProductCard = serde_json::from_value(json!({"price": 790.5})).unwrap();
        assert_eq!(raw.price, Some(Decimal::new(7905, 1)));

        let raw: RawProductCard = serde_json::from_value(json!({"price": "free"})).unwrap();
        assert!(raw.price.is_none());
    }

    #[test]
    fn test_items_drop_bad_elements() {
        let raw: RawPost = serde_json::from_value(json!({
            "relatedProducts": [
                {"_id": "p1", "slug": "golden-spoon"},
                null,
                "dangling",
                {"_id": "p2", "slug": "golden-bowl"}
            ]
        }))
        .unwrap();

        let ids: Vec<_> = raw
            .related_products
            .iter()
            .map(|p| p.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[test]
    fn test_related_products_null_is_empty() {
        let raw: RawPostCard =
            serde_json::from_value(json!({"relatedProducts": null})).unwrap();
        assert!(raw.related_products.is_empty());
    }

    #[test]
    fn test_image_with_partial_metadata() {
        let raw: RawImage = serde_json::from_value(json!({
            "_type": "image",
            "_key": "k1",
            "asset": {"_ref": "image-abc123-1200x800-jpg", "_type": "reference"},
            "crop": {"top": 0.1},
            "hotspot": {"x": 0.5, "y": 0.5, "width": 0.3, "height": 0.3}
        }))
        .unwrap();

        assert_eq!(
            raw.asset.unwrap().reference.as_deref(),
            Some("image-abc123-1200x800-jpg")
        );
        assert!(raw.crop.is_none());
        assert!(raw.hotspot.is_some());
    }

    #[test]
    fn test_span_text_keeps_whitespace() {
        let raw: RawSpan = serde_json::from_value(json!({"_type": "span", "text": " "})).unwrap();
        assert_eq!(raw.text, " ");
    }

    #[test]
    fn test_collect_items_non_array_is_empty() {
        let items: Vec<RawPostCard> = lenient::collect_items(json!({"result": []}));
        assert!(items.is_empty());
    }
}
