//! Labelled enums for product records.
//!
//! Each enum serializes as its human-readable label (the same string the
//! admin form submits and the document store keeps), so the labels are part
//! of the stored data format and must not change.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of an enum's labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct LabelError {
    /// Name of the enum that rejected the value.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Defines an enum whose variants map one-to-one onto display labels.
///
/// Generates serde renames, `ALL`, `LABELS`, `label()`, `Display` and a
/// `FromStr` that accepts exactly the labels.
macro_rules! define_labels {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Every label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// The label stored and displayed for this variant.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = LabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(LabelError {
                        kind: stringify!($name),
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

define_labels! {
    /// Product category. Drives storefront navigation.
    Category {
        Pens => "Pens",
        Notebooks => "Notebooks",
        StaplersStaples => "Staplers/Staples",
        StickyNotes => "Sticky Notes",
        DeskOrganizers => "Desk Organizers",
    }
}

define_labels! {
    /// Whether a product can currently be ordered.
    AvailabilityStatus {
        InStock => "In Stock",
        OutOfStock => "Out of Stock",
    }
}

define_labels! {
    /// Return window offered for a product.
    ReturnPolicy {
        NoReturn => "No return policy",
        Days7 => "7 days return policy",
        Days14 => "14 days return policy",
        Days30 => "30 days return policy",
        Days60 => "60 days return policy",
        Days90 => "90 days return policy",
    }
}

impl Category {
    /// URL slug used by the storefront category pages.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Pens => "pens",
            Self::Notebooks => "notebooks",
            Self::StaplersStaples => "staplers-staples",
            Self::StickyNotes => "sticky-notes",
            Self::DeskOrganizers => "desk-organizers",
        }
    }

    /// Look up a category by its URL slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.slug() == slug)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::StaplersStaples).unwrap();
        assert_eq!(json, "\"Staplers/Staples\"");

        let parsed: Category = serde_json::from_str("\"Sticky Notes\"").unwrap();
        assert_eq!(parsed, Category::StickyNotes);
    }

    #[test]
    fn test_from_str_accepts_only_labels() {
        assert_eq!(
            "In Stock".parse::<AvailabilityStatus>().unwrap(),
            AvailabilityStatus::InStock
        );
        let err = "IN_STOCK".parse::<AvailabilityStatus>().unwrap_err();
        assert_eq!(err.kind, "AvailabilityStatus");
        assert_eq!(err.to_string(), "invalid AvailabilityStatus: IN_STOCK");
    }

    #[test]
    fn test_category_slugs() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(*category));
        }
        assert_eq!(Category::from_slug("staplers-staples"), Some(Category::StaplersStaples));
        assert_eq!(Category::from_slug("Staplers/Staples"), None);
    }

    #[test]
    fn test_return_policy_labels_in_order() {
        assert_eq!(ReturnPolicy::LABELS.len(), ReturnPolicy::ALL.len());
        assert_eq!(ReturnPolicy::LABELS.first(), Some(&"No return policy"));
        assert_eq!(ReturnPolicy::Days30.to_string(), "30 days return policy");
    }
}
