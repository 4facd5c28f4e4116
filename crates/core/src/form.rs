//! Form normalization.
//!
//! The admin product form arrives as flat key/value pairs: nested dimensions
//! use dotted keys (`dimensions.width`) and lists use repeated keys
//! (`images`, `tags`). [`ProductDraft::from_fields`] turns that into a
//! structured draft without interpreting any values. Numbers stay strings so
//! the validator can report parse failures against the right field.

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};
use crate::validation::ProductField;

/// Key carrying the product id on edit submissions.
pub const ID_KEY: &str = "id";
/// Repeated key carrying image URLs.
pub const IMAGES_KEY: &str = "images";
/// Repeated key carrying tags from older form revisions.
pub const TAGS_KEY: &str = "tags";

/// A flat form submission. Keys may repeat; order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    /// Create an empty submission.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a value. Existing values for the same key are kept.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value submitted for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted for `key`, in submission order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every pair, in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of submitted pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Whether a submission creates a new product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

/// Unvalidated dimensions, straight from the dotted form keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionsDraft {
    pub width: Option<String>,
    pub height: Option<String>,
    pub depth: Option<String>,
}

/// A structured but unvalidated product.
///
/// Scalar values are trimmed; blank values become `None`. This is also the
/// shape echoed back to the form when a submission fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub discount_percentage: Option<String>,
    pub stock: Option<String>,
    pub brand: Option<String>,
    pub weight: Option<String>,
    pub dimensions: DimensionsDraft,
    pub material: Option<String>,
    pub color: Option<String>,
    pub pack_quantity: Option<String>,
    pub page_count: Option<String>,
    pub warranty_information: Option<String>,
    pub shipping_information: Option<String>,
    pub availability_status: Option<String>,
    pub return_policy: Option<String>,
    pub minimum_order_quantity: Option<String>,
    pub images: Vec<String>,
    /// Collected for compatibility; not part of the stored record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ProductDraft {
    /// Normalize a flat form submission.
    #[must_use]
    pub fn from_fields(fields: &FormFields) -> Self {
        let text = |field: ProductField| fields.get(field.key()).and_then(non_blank);
        let list = |key: &str| {
            fields
                .get_all(key)
                .filter_map(non_blank)
                .collect::<Vec<_>>()
        };

        Self {
            id: fields.get(ID_KEY).and_then(non_blank),
            title: text(ProductField::Title),
            description: text(ProductField::Description),
            category: text(ProductField::Category),
            price: text(ProductField::Price),
            discount_percentage: text(ProductField::DiscountPercentage),
            stock: text(ProductField::Stock),
            brand: text(ProductField::Brand),
            weight: text(ProductField::Weight),
            dimensions: DimensionsDraft {
                width: text(ProductField::DimensionsWidth),
                height: text(ProductField::DimensionsHeight),
                depth: text(ProductField::DimensionsDepth),
            },
            material: text(ProductField::Material),
            color: text(ProductField::Color),
            pack_quantity: text(ProductField::PackQuantity),
            page_count: text(ProductField::PageCount),
            warranty_information: text(ProductField::WarrantyInformation),
            shipping_information: text(ProductField::ShippingInformation),
            availability_status: text(ProductField::AvailabilityStatus),
            return_policy: text(ProductField::ReturnPolicy),
            minimum_order_quantity: text(ProductField::MinimumOrderQuantity),
            images: list(IMAGES_KEY),
            tags: list(TAGS_KEY),
        }
    }

    /// Prefill a draft from a stored product, for the edit form.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let record = &product.record;
        Self {
            id: Some(product.id.to_string()),
            title: Some(record.title.clone()),
            description: Some(record.description.clone()),
            category: Some(record.category.to_string()),
            price: Some(record.price.to_string()),
            discount_percentage: record.discount_percentage.map(|d| d.to_string()),
            stock: Some(record.stock.to_string()),
            brand: Some(record.brand.clone()),
            weight: Some(record.weight.to_string()),
            dimensions: DimensionsDraft {
                width: Some(record.dimensions.width.to_string()),
                height: Some(record.dimensions.height.to_string()),
                depth: Some(record.dimensions.depth.to_string()),
            },
            material: record.material.clone(),
            color: record.color.clone(),
            pack_quantity: record.pack_quantity.map(|n| n.to_string()),
            page_count: record.page_count.map(|n| n.to_string()),
            warranty_information: Some(record.warranty_information.clone()),
            shipping_information: Some(record.shipping_information.clone()),
            availability_status: Some(record.availability_status.to_string()),
            return_policy: Some(record.return_policy.to_string()),
            minimum_order_quantity: Some(record.minimum_order_quantity.to_string()),
            images: record.images.clone(),
            tags: Vec::new(),
        }
    }

    /// Create when no id was submitted, edit otherwise.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.id
            .as_deref()
            .map_or(FormMode::Create, |id| FormMode::Edit(ProductId::new(id)))
    }

    /// The scalar value submitted for `field`.
    ///
    /// Always `None` for list fields; use [`ProductDraft::list`] for those.
    #[must_use]
    pub fn value(&self, field: ProductField) -> Option<&str> {
        let value = match field {
            ProductField::Title => &self.title,
            ProductField::Description => &self.description,
            ProductField::Category => &self.category,
            ProductField::Price => &self.price,
            ProductField::DiscountPercentage => &self.discount_percentage,
            ProductField::Stock => &self.stock,
            ProductField::Brand => &self.brand,
            ProductField::Weight => &self.weight,
            ProductField::DimensionsWidth => &self.dimensions.width,
            ProductField::DimensionsHeight => &self.dimensions.height,
            ProductField::DimensionsDepth => &self.dimensions.depth,
            ProductField::Material => &self.material,
            ProductField::Color => &self.color,
            ProductField::PackQuantity => &self.pack_quantity,
            ProductField::PageCount => &self.page_count,
            ProductField::WarrantyInformation => &self.warranty_information,
            ProductField::ShippingInformation => &self.shipping_information,
            ProductField::AvailabilityStatus => &self.availability_status,
            ProductField::ReturnPolicy => &self.return_policy,
            ProductField::MinimumOrderQuantity => &self.minimum_order_quantity,
            ProductField::Images => return None,
        };
        value.as_deref()
    }

    /// The values submitted for a list field. Empty for scalar fields.
    #[must_use]
    pub fn list(&self, field: ProductField) -> &[String] {
        match field {
            ProductField::Images => &self.images,
            _ => &[],
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
