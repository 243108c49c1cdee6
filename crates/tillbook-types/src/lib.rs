//! Shared record types for Tillbook.
//!
//! Every crate in the workspace speaks in these shapes: the catalog stores
//! read and write them, and the server serializes them over HTTP. Persisted
//! records (`Product`, `Service`) carry the store-assigned `id`; the
//! `New*` shapes are what clients submit and what create/list responses echo
//! back, without the id.

use serde::{Deserialize, Serialize};

/// Default number of records returned by a list call.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier. Never changes once assigned.
    pub id: i64,
    pub name: String,
    /// Free-form product category.
    #[serde(rename = "type")]
    pub product_type: String,
    pub buying_price: f64,
    pub selling_price: f64,
}

/// Product fields as submitted by a client and echoed in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub buying_price: f64,
    pub selling_price: f64,
}

impl From<Product> for NewProduct {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            product_type: product.product_type,
            buying_price: product.buying_price,
            selling_price: product.selling_price,
        }
    }
}

/// A persisted service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Store-assigned identifier. Never changes once assigned.
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Service fields as submitted by a client and echoed in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl From<Service> for NewService {
    fn from(service: Service) -> Self {
        Self {
            name: service.name,
            description: service.description,
            price: service.price,
        }
    }
}

/// A skip/limit window over a record listing.
///
/// Deserializes from query strings such as `?skip=20&limit=10`; omitted
/// fields fall back to `skip = 0` and `limit = 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of records to pass over before collecting.
    #[serde(default)]
    pub skip: u32,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_field_uses_wire_name() {
        let json = serde_json::json!({
            "name": "Brake Pad",
            "type": "spare part",
            "buying_price": 12.5,
            "selling_price": 20.0
        });

        let product: NewProduct = serde_json::from_value(json).expect("should deserialize");
        assert_eq!(product.product_type, "spare part");

        let back = serde_json::to_value(&product).expect("should serialize");
        assert_eq!(back["type"], "spare part");
        assert!(back.get("product_type").is_none());
    }

    #[test]
    fn new_service_requires_price() {
        let json = serde_json::json!({
            "name": "Oil Change",
            "description": "Basic oil change"
        });

        let err = serde_json::from_value::<NewService>(json).expect_err("price is required");
        assert!(err.to_string().contains("price"), "unexpected error: {err}");
    }

    #[test]
    fn persisted_record_drops_id_when_echoed() {
        let service = Service {
            id: 7,
            name: "Oil Change".to_string(),
            description: "Basic oil change".to_string(),
            price: 29.99,
        };

        let body = serde_json::to_value(NewService::from(service)).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["price"], 29.99);
    }

    #[test]
    fn page_defaults_apply_to_missing_fields() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page, Page::default());
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);

        let page: Page = serde_json::from_str(r#"{"skip": 5}"#).unwrap();
        assert_eq!(page.skip, 5);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn page_rejects_negative_values() {
        assert!(serde_json::from_str::<Page>(r#"{"skip": -1}"#).is_err());
        assert!(serde_json::from_str::<Page>(r#"{"limit": -5}"#).is_err());
    }
}
