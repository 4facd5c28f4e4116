//! Seed the catalog with products from a YAML file.
//!
//! The file is a list of flat product forms, the same shape the admin form
//! submits. Lists become repeated keys and nested maps become dotted keys:
//!
//! ```yaml
//! - title: Blue Gel Pen
//!   category: Pens
//!   price: 12.50
//!   dimensions:
//!     width: 1
//!     height: 14
//!     depth: 1
//!   images:
//!     - https://cdn.example.com/products/blue-gel-pen.jpg
//! ```
//!
//! Every form goes through the same submission pipeline as the admin
//! service, so seeded products are validated exactly like hand-entered ones.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use deskshop_catalog::store::create_pool;
use deskshop_catalog::{PgDocumentStore, ProductPipeline, ProductRepository};
use deskshop_core::FormFields;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::database_url;

/// A single YAML scalar.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SeedScalar {
    Flag(bool),
    Number(serde_yaml::Number),
    Text(String),
}

impl fmt::Display for SeedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One field of a seed form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SeedValue {
    List(Vec<SeedScalar>),
    Nested(BTreeMap<String, SeedScalar>),
    Scalar(SeedScalar),
}

type SeedForm = BTreeMap<String, SeedValue>;

/// Parse a YAML list of seed forms into flat form submissions.
pub(crate) fn parse_forms(yaml: &str) -> Result<Vec<FormFields>, serde_yaml::Error> {
    let forms: Vec<SeedForm> = serde_yaml::from_str(yaml)?;
    Ok(forms.into_iter().map(flatten).collect())
}

fn flatten(form: SeedForm) -> FormFields {
    let mut fields = FormFields::new();
    for (key, value) in form {
        match value {
            SeedValue::Scalar(value) => fields.push(key, value.to_string()),
            SeedValue::List(values) => {
                for value in values {
                    fields.push(key.clone(), value.to_string());
                }
            }
            SeedValue::Nested(values) => {
                for (child, value) in values {
                    fields.push(format!("{key}.{child}"), value.to_string());
                }
            }
        }
    }
    fields
}

/// Result of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SeedSummary {
    pub created: usize,
    pub rejected: usize,
}

/// Submit each form in order, logging every outcome.
pub(crate) async fn seed_forms(pipeline: &ProductPipeline, forms: &[FormFields]) -> SeedSummary {
    let mut summary = SeedSummary::default();

    for (index, fields) in forms.iter().enumerate() {
        let title = fields.get("title").unwrap_or("<untitled>");
        let outcome = pipeline.submit(fields).await;

        if outcome.success {
            summary.created += 1;
            let id = outcome.product.as_ref().map(|p| p.id.to_string());
            info!(index, title, id = ?id, "{}", outcome.message);
        } else {
            summary.rejected += 1;
            warn!(index, title, errors = ?outcome.errors, "{}", outcome.message);
        }
    }

    summary
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or any product is rejected.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");

    // Read and parse YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let forms = parse_forms(&content)?;
    info!(products = forms.len(), "Parsed seed file");

    let database_url = database_url()?;
    let pool = create_pool(&database_url).await?;
    info!("Connected to database");

    let pipeline = ProductPipeline::new(ProductRepository::new(Arc::new(PgDocumentStore::new(pool))));
    let summary = seed_forms(&pipeline, &forms).await;

    info!("Seeding complete!");
    info!("  Products created: {}", summary.created);
    info!("  Products rejected: {}", summary.rejected);

    if summary.rejected > 0 {
        error!("{} of {} products were rejected", summary.rejected, forms.len());
        return Err(format!("{} products rejected", summary.rejected).into());
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use deskshop_catalog::MemoryDocumentStore;

    use super::*;

    const SEED: &str = r"
- title: Blue Gel Pen
  description: A smooth-writing gel pen with a comfortable grip, ideal for daily notes.
  category: Pens
  price: 12.50
  stock: 40
  brand: Inkwell
  weight: 0.02
  dimensions:
    width: 1
    height: 14
    depth: 1
  warrantyInformation: 1 year warranty
  shippingInformation: Ships in 2 days
  availabilityStatus: In Stock
  returnPolicy: 30 days return policy
  minimumOrderQuantity: 1
  images:
    - https://cdn.example.com/products/blue-gel-pen.jpg
    - https://cdn.example.com/products/blue-gel-pen-2.jpg
";

    fn pipeline() -> ProductPipeline {
        ProductPipeline::new(ProductRepository::new(Arc::new(MemoryDocumentStore::new())))
    }

    #[test]
    fn test_parse_forms_flattens_lists_and_maps() {
        let forms = parse_forms(SEED).unwrap();
        assert_eq!(forms.len(), 1);

        let form = &forms[0];
        assert_eq!(form.get("title"), Some("Blue Gel Pen"));
        assert_eq!(form.get("price"), Some("12.5"));
        assert_eq!(form.get("dimensions.height"), Some("14"));
        assert_eq!(form.get_all("images").count(), 2);
    }

    #[test]
    fn test_parse_forms_rejects_non_list() {
        assert!(parse_forms("title: Blue Gel Pen").is_err());
    }

    #[tokio::test]
    async fn test_seed_forms_creates_products() {
        let pipeline = pipeline();
        let forms = parse_forms(SEED).unwrap();

        let summary = seed_forms(&pipeline, &forms).await;

        assert_eq!(summary, SeedSummary { created: 1, rejected: 0 });
        let products = pipeline.products().get_all().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].record.title, "Blue Gel Pen");
    }

    #[tokio::test]
    async fn test_seed_forms_reports_duplicates() {
        let pipeline = pipeline();
        let mut forms = parse_forms(SEED).unwrap();
        forms.extend(parse_forms(SEED).unwrap());

        let summary = seed_forms(&pipeline, &forms).await;

        assert_eq!(summary, SeedSummary { created: 1, rejected: 1 });
    }
}
