//! Product schema validation.
//!
//! Every product field is described once in [`PRODUCT_RULES`]: whether it is
//! required, optional or a list, and the ordered checks its value must pass.
//! Create and edit submissions are validated against the same table.
//!
//! Scalar fields stop at their first failing check, since later checks (a
//! lower bound, say) depend on earlier ones (parsing a number). List fields
//! run every check against every entry, so a field can carry several errors.
//!
//! An empty image list passes validation. The repository rejects it
//! separately, so the rule applies to every write path and not only to form
//! submissions.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::form::ProductDraft;
use crate::types::{
    AvailabilityStatus, Category, Dimensions, ProductRecord, ReturnPolicy,
};

/// A validated field, in declaration order.
///
/// The derived `Ord` follows declaration order, which is what keeps error
/// maps deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Title,
    Description,
    Category,
    Price,
    DiscountPercentage,
    Stock,
    Brand,
    Weight,
    DimensionsWidth,
    DimensionsHeight,
    DimensionsDepth,
    Material,
    Color,
    PackQuantity,
    PageCount,
    WarrantyInformation,
    ShippingInformation,
    AvailabilityStatus,
    ReturnPolicy,
    MinimumOrderQuantity,
    Images,
}

impl ProductField {
    /// The form key (and error map key) for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Price => "price",
            Self::DiscountPercentage => "discountPercentage",
            Self::Stock => "stock",
            Self::Brand => "brand",
            Self::Weight => "weight",
            Self::DimensionsWidth => "dimensions.width",
            Self::DimensionsHeight => "dimensions.height",
            Self::DimensionsDepth => "dimensions.depth",
            Self::Material => "material",
            Self::Color => "color",
            Self::PackQuantity => "packQuantity",
            Self::PageCount => "pageCount",
            Self::WarrantyInformation => "warrantyInformation",
            Self::ShippingInformation => "shippingInformation",
            Self::AvailabilityStatus => "availabilityStatus",
            Self::ReturnPolicy => "returnPolicy",
            Self::MinimumOrderQuantity => "minimumOrderQuantity",
            Self::Images => "images",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for ProductField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required")]
    Missing,
    #[error("Must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Must be at most {max} characters")]
    TooLong { max: usize },
    #[error("Must be a number")]
    NotANumber,
    #[error("Must be a whole number")]
    NotAWholeNumber,
    #[error("Must be greater than 0")]
    NotPositive,
    #[error("{}", range_message(.min, .max))]
    OutOfRange { min: Decimal, max: Option<Decimal> },
    #[error("Must be one of: {}", .allowed.join(", "))]
    InvalidEnum { allowed: &'static [&'static str] },
    #[error("Must be a valid URL")]
    InvalidUrl,
}

impl FieldError {
    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::TooShort { .. } => "TooShort",
            Self::TooLong { .. } => "TooLong",
            Self::NotANumber => "NotANumber",
            Self::NotAWholeNumber => "NotAWholeNumber",
            Self::NotPositive => "NotPositive",
            Self::OutOfRange { .. } => "OutOfRange",
            Self::InvalidEnum { .. } => "InvalidEnum",
            Self::InvalidUrl => "InvalidURL",
        }
    }
}

fn range_message(min: &Decimal, max: &Option<Decimal>) -> String {
    match max {
        Some(max) => format!("Must be between {min} and {max}"),
        None => format!("Must be {min} or more"),
    }
}

/// Field errors keyed by field, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<ProductField, Vec<FieldError>>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Errors containing a single failure.
    #[must_use]
    pub fn single(field: ProductField, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.push(field, error);
        errors
    }

    pub fn push(&mut self, field: ProductField, error: FieldError) {
        self.0.entry(field).or_default().push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors recorded for `field`, empty if it passed.
    #[must_use]
    pub fn get(&self, field: ProductField) -> &[FieldError] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Error codes recorded for `field`.
    #[must_use]
    pub fn codes(&self, field: ProductField) -> Vec<&'static str> {
        self.get(field).iter().map(FieldError::code).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductField, &[FieldError])> {
        self.0.iter().map(|(field, errors)| (*field, errors.as_slice()))
    }

    /// Human-readable messages per field, for re-rendering a form.
    #[must_use]
    pub fn messages(&self) -> BTreeMap<ProductField, Vec<String>> {
        self.0
            .iter()
            .map(|(field, errors)| (*field, errors.iter().map(ToString::to_string).collect()))
            .collect()
    }
}

// =============================================================================
// Rule Table
// =============================================================================

/// How a field's presence is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent or blank is a [`FieldError::Missing`].
    Required,
    /// Absent or blank means "not present"; checks run only on a value.
    Optional,
    /// Zero or more values; checks run on each.
    List,
}

/// One check applied to a raw submitted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Character count within `min..=max`.
    Length { min: usize, max: usize },
    /// Parses as a decimal number.
    Number,
    /// Parses as an integer.
    WholeNumber,
    /// Strictly greater than zero.
    Positive,
    /// Greater than or equal to the bound.
    AtLeast(Decimal),
    /// Within `min..=max`.
    Between { min: Decimal, max: Decimal },
    /// Exactly one of the listed labels.
    OneOf(&'static [&'static str]),
    /// Absolute `http` or `https` URL.
    Url,
}

impl Check {
    fn apply(self, value: &str) -> Result<(), FieldError> {
        match self {
            Self::Length { min, max } => {
                let len = value.chars().count();
                if len < min {
                    Err(FieldError::TooShort { min })
                } else if len > max {
                    Err(FieldError::TooLong { max })
                } else {
                    Ok(())
                }
            }
            Self::Number => parse_decimal(value).map(drop),
            Self::WholeNumber => value
                .parse::<i64>()
                .map(drop)
                .map_err(|_| FieldError::NotAWholeNumber),
            Self::Positive => {
                if parse_decimal(value)? > Decimal::ZERO {
                    Ok(())
                } else {
                    Err(FieldError::NotPositive)
                }
            }
            Self::AtLeast(min) => {
                if parse_decimal(value)? >= min {
                    Ok(())
                } else {
                    Err(FieldError::OutOfRange { min, max: None })
                }
            }
            Self::Between { min, max } => {
                let number = parse_decimal(value)?;
                if number >= min && number <= max {
                    Ok(())
                } else {
                    Err(FieldError::OutOfRange {
                        min,
                        max: Some(max),
                    })
                }
            }
            Self::OneOf(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(FieldError::InvalidEnum { allowed })
                }
            }
            Self::Url => match url::Url::parse(value) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
                _ => Err(FieldError::InvalidUrl),
            },
        }
    }
}

/// A row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: ProductField,
    pub presence: Presence,
    pub checks: &'static [Check],
}

impl FieldRule {
    const fn required(field: ProductField, checks: &'static [Check]) -> Self {
        Self {
            field,
            presence: Presence::Required,
            checks,
        }
    }

    const fn optional(field: ProductField, checks: &'static [Check]) -> Self {
        Self {
            field,
            presence: Presence::Optional,
            checks,
        }
    }

    const fn list(field: ProductField, checks: &'static [Check]) -> Self {
        Self {
            field,
            presence: Presence::List,
            checks,
        }
    }

    fn check(&self, value: &str) -> Result<(), FieldError> {
        self.checks.iter().try_for_each(|check| check.apply(value))
    }
}

const POSITIVE_NUMBER: &[Check] = &[Check::Number, Check::Positive];
const POSITIVE_WHOLE_NUMBER: &[Check] = &[Check::WholeNumber, Check::Positive];
const SHORT_TEXT: &[Check] = &[Check::Length { min: 2, max: 50 }];
const POLICY_TEXT: &[Check] = &[Check::Length { min: 2, max: 100 }];

/// The product schema, in field declaration order.
pub const PRODUCT_RULES: &[FieldRule] = &[
    FieldRule::required(ProductField::Title, &[Check::Length { min: 3, max: 100 }]),
    FieldRule::required(
        ProductField::Description,
        &[Check::Length { min: 50, max: 500 }],
    ),
    FieldRule::required(ProductField::Category, &[Check::OneOf(Category::LABELS)]),
    FieldRule::required(ProductField::Price, POSITIVE_NUMBER),
    FieldRule::optional(
        ProductField::DiscountPercentage,
        &[
            Check::Number,
            Check::Between {
                min: Decimal::ZERO,
                max: Decimal::ONE_HUNDRED,
            },
        ],
    ),
    FieldRule::required(
        ProductField::Stock,
        &[Check::WholeNumber, Check::AtLeast(Decimal::ZERO)],
    ),
    FieldRule::required(ProductField::Brand, SHORT_TEXT),
    FieldRule::required(ProductField::Weight, POSITIVE_NUMBER),
    FieldRule::required(ProductField::DimensionsWidth, POSITIVE_NUMBER),
    FieldRule::required(ProductField::DimensionsHeight, POSITIVE_NUMBER),
    FieldRule::required(ProductField::DimensionsDepth, POSITIVE_NUMBER),
    FieldRule::optional(ProductField::Material, SHORT_TEXT),
    FieldRule::optional(ProductField::Color, SHORT_TEXT),
    FieldRule::optional(ProductField::PackQuantity, POSITIVE_WHOLE_NUMBER),
    FieldRule::optional(ProductField::PageCount, POSITIVE_WHOLE_NUMBER),
    FieldRule::required(ProductField::WarrantyInformation, POLICY_TEXT),
    FieldRule::required(ProductField::ShippingInformation, POLICY_TEXT),
    FieldRule::required(
        ProductField::AvailabilityStatus,
        &[Check::OneOf(AvailabilityStatus::LABELS)],
    ),
    FieldRule::required(
        ProductField::ReturnPolicy,
        &[Check::OneOf(ReturnPolicy::LABELS)],
    ),
    FieldRule::required(
        ProductField::MinimumOrderQuantity,
        &[Check::WholeNumber, Check::AtLeast(Decimal::ONE)],
    ),
    FieldRule::list(ProductField::Images, &[Check::Url]),
];

// =============================================================================
// Evaluation
// =============================================================================

/// Validate a draft against [`PRODUCT_RULES`] and build the typed record.
///
/// # Errors
///
/// Returns every field error found, keyed by field in declaration order.
pub fn validate(draft: &ProductDraft) -> Result<ProductRecord, FieldErrors> {
    let mut errors = FieldErrors::new();

    for rule in PRODUCT_RULES {
        match rule.presence {
            Presence::List => {
                for value in draft.list(rule.field) {
                    if let Err(error) = rule.check(value) {
                        errors.push(rule.field, error);
                    }
                }
            }
            Presence::Required | Presence::Optional => match draft.value(rule.field) {
                Some(value) => {
                    if let Err(error) = rule.check(value) {
                        errors.push(rule.field, error);
                    }
                }
                None if rule.presence == Presence::Required => {
                    errors.push(rule.field, FieldError::Missing);
                }
                None => {}
            },
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    assemble(draft).map_err(|(field, error)| FieldErrors::single(field, error))
}

type Failure = (ProductField, FieldError);

/// Convert an already-checked draft into its typed record.
fn assemble(draft: &ProductDraft) -> Result<ProductRecord, Failure> {
    Ok(ProductRecord {
        title: text(draft, ProductField::Title)?,
        description: text(draft, ProductField::Description)?,
        category: parsed(draft, ProductField::Category, invalid_enum(Category::LABELS))?,
        price: parsed(draft, ProductField::Price, FieldError::NotANumber)?,
        discount_percentage: optional(
            draft,
            ProductField::DiscountPercentage,
            FieldError::NotANumber,
        )?,
        stock: parsed(draft, ProductField::Stock, FieldError::NotAWholeNumber)?,
        brand: text(draft, ProductField::Brand)?,
        weight: parsed(draft, ProductField::Weight, FieldError::NotANumber)?,
        dimensions: Dimensions {
            width: parsed(draft, ProductField::DimensionsWidth, FieldError::NotANumber)?,
            height: parsed(draft, ProductField::DimensionsHeight, FieldError::NotANumber)?,
            depth: parsed(draft, ProductField::DimensionsDepth, FieldError::NotANumber)?,
        },
        material: draft.value(ProductField::Material).map(str::to_owned),
        color: draft.value(ProductField::Color).map(str::to_owned),
        pack_quantity: optional(draft, ProductField::PackQuantity, FieldError::NotAWholeNumber)?,
        page_count: optional(draft, ProductField::PageCount, FieldError::NotAWholeNumber)?,
        warranty_information: text(draft, ProductField::WarrantyInformation)?,
        shipping_information: text(draft, ProductField::ShippingInformation)?,
        availability_status: parsed(
            draft,
            ProductField::AvailabilityStatus,
            invalid_enum(AvailabilityStatus::LABELS),
        )?,
        return_policy: parsed(
            draft,
            ProductField::ReturnPolicy,
            invalid_enum(ReturnPolicy::LABELS),
        )?,
        minimum_order_quantity: parsed(
            draft,
            ProductField::MinimumOrderQuantity,
            FieldError::NotAWholeNumber,
        )?,
        images: draft.list(ProductField::Images).to_vec(),
    })
}

const fn invalid_enum(allowed: &'static [&'static str]) -> FieldError {
    FieldError::InvalidEnum { allowed }
}

fn text(draft: &ProductDraft, field: ProductField) -> Result<String, Failure> {
    draft
        .value(field)
        .map(str::to_owned)
        .ok_or((field, FieldError::Missing))
}

fn parsed<T: FromStr>(
    draft: &ProductDraft,
    field: ProductField,
    on_error: FieldError,
) -> Result<T, Failure> {
    let value = draft.value(field).ok_or((field, FieldError::Missing))?;
    value.parse().map_err(|_| (field, on_error))
}

fn optional<T: FromStr>(
    draft: &ProductDraft,
    field: ProductField,
    on_error: FieldError,
) -> Result<Option<T>, Failure> {
    draft
        .value(field)
        .map(|value| value.parse().map_err(|_| (field, on_error)))
        .transpose()
}

fn parse_decimal(value: &str) -> Result<Decimal, FieldError> {
    Decimal::from_str(value).map_err(|_| FieldError::NotANumber)
}
