//! Transport shapes for cart items and their images.
//!
//! These are what clients send and receive. They are deliberately decoupled
//! from the persisted rows in `opencart-db`: no owner, no timestamps, no
//! soft-delete flag.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A cart item as seen by API clients.
///
/// On input the `id` is ignored for creation and optional for updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    #[serde(default)]
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: i32,
}

/// An image attached to a cart item, as seen by API clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemImageDto {
    #[serde(default)]
    pub id: DbId,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Raw image bytes; standard base64 on the wire.
    #[serde(default, with = "base64_bytes")]
    pub file_bytes: Vec<u8>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub length: i64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_bytes_travel_as_base64() {
        let dto = CartItemImageDto {
            file_bytes: vec![0x89, b'P', b'N', b'G'],
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["fileBytes"], "iVBORw==");

        let back: CartItemImageDto = serde_json::from_value(json).unwrap();
        assert_eq!(back.file_bytes, dto.file_bytes);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let result: Result<CartItemImageDto, _> =
            serde_json::from_value(serde_json::json!({ "fileBytes": "not base64!" }));
        assert!(result.is_err());
    }

    #[test]
    fn cart_item_accepts_numeric_price_and_missing_id() {
        let dto: CartItemDto = serde_json::from_value(serde_json::json!({
            "name": "Widget",
            "price": 9.99,
            "quantity": 3
        }))
        .unwrap();
        assert_eq!(dto.id, DbId::nil());
        assert_eq!(dto.price, Decimal::new(999, 2));
        assert_eq!(dto.description, None);
    }
}
