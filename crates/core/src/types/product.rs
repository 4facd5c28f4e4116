//! The product record.
//!
//! [`ProductRecord`] is the validated, client-supplied part of a product.
//! [`Product`] adds the store-assigned id and the bookkeeping [`Meta`].
//!
//! Optional fields are skipped when serializing, so an absent discount or
//! colour never reaches the document store as a `null` placeholder.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AvailabilityStatus, Category, ProductId, ReturnPolicy};

/// Physical dimensions in centimetres. All three are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Decimal,
    pub height: Decimal,
    pub depth: Decimal,
}

/// Validated product fields, as submitted through the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,
    pub stock: u32,
    pub brand: String,
    pub weight: Decimal,
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Items per pack, e.g. 10 for a 10-pack of pens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_quantity: Option<u32>,
    /// Pages per notebook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: AvailabilityStatus,
    pub return_policy: ReturnPolicy,
    pub minimum_order_quantity: u32,
    /// Image URLs in display order. The first one is the thumbnail.
    pub images: Vec<String>,
}

/// Bookkeeping written by the server, never by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Set once when the product is created.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful write.
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// `data:` URI of a QR code pointing at the public product page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl Meta {
    /// Meta for a record first written at `now`.
    #[must_use]
    pub const fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            barcode: None,
            qr_code: None,
        }
    }
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub record: ProductRecord,
    pub meta: Meta,
}

impl Product {
    /// The first image, used for listings and cart lines.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.record.images.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    /// A record that passes every validation rule.
    pub fn record(title: &str) -> ProductRecord {
        ProductRecord {
            title: title.to_owned(),
            description: "A smooth-writing gel pen with a comfortable grip, ideal for daily notes."
                .to_owned(),
            category: Category::Pens,
            price: Decimal::new(1250, 2),
            discount_percentage: None,
            stock: 40,
            brand: "Inkwell".to_owned(),
            weight: Decimal::new(15, 0),
            dimensions: Dimensions {
                width: Decimal::new(1, 0),
                height: Decimal::new(14, 0),
                depth: Decimal::new(1, 0),
            },
            material: None,
            color: Some("Blue".to_owned()),
            pack_quantity: None,
            page_count: None,
            warranty_information: "1 year warranty".to_owned(),
            shipping_information: "Ships in 2 days".to_owned(),
            availability_status: AvailabilityStatus::InStock,
            return_policy: ReturnPolicy::Days30,
            minimum_order_quantity: 1,
            images: vec!["https://cdn.example.com/products/blue-pen.jpg".to_owned()],
        }
    }

    pub fn product(id: &str, title: &str) -> Product {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Product {
            id: ProductId::new(id),
            record: record(title),
            meta: Meta::created(at),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_optionals_are_not_serialized() {
        let product = fixtures::product("p1", "Blue Pen");
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], "p1");
        assert_eq!(json["title"], "Blue Pen");
        assert_eq!(json["color"], "Blue");
        assert!(json.get("material").is_none());
        assert!(json.get("discountPercentage").is_none());
        assert!(json["meta"].get("qrCode").is_none());
    }

    #[test]
    fn test_timestamps_are_iso_8601() {
        let product = fixtures::product("p1", "Blue Pen");
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["meta"]["createdAt"], "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_deserializes_from_stored_shape() {
        let product = fixtures::product("p1", "Blue Pen");
        let json = serde_json::to_string(&product).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, product);
        assert_eq!(parsed.thumbnail(), Some("https://cdn.example.com/products/blue-pen.jpg"));
    }
}
