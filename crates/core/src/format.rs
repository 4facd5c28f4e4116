//! Display formatting for product data.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Dimensions;

/// Format a price as dollars with two decimals, or `N/A` when absent.
///
/// ```
/// # use deskshop_core::format::format_price;
/// # use rust_decimal::Decimal;
/// assert_eq!(format_price(Some(Decimal::new(125, 1))), "$12.50");
/// assert_eq!(format_price(None), "N/A");
/// ```
#[must_use]
pub fn format_price(price: Option<Decimal>) -> String {
    price.map_or_else(
        || "N/A".to_string(),
        |price| {
            let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("${rounded:.2}")
        },
    )
}

/// Format a percentage, `0%` when absent.
#[must_use]
pub fn format_percentage(value: Option<Decimal>) -> String {
    value.map_or_else(|| "0%".to_string(), |value| format!("{}%", value.normalize()))
}

/// Apply a percentage discount. Absent or non-positive discounts leave the
/// price unchanged.
#[must_use]
pub fn discounted_price(price: Decimal, discount_percentage: Option<Decimal>) -> Decimal {
    match discount_percentage {
        Some(discount) if discount > Decimal::ZERO => {
            price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED)
        }
        _ => price,
    }
}

/// Title shown on product pages: `"{brand}. {title}"`.
#[must_use]
pub fn display_title(brand: &str, title: &str) -> String {
    format!("{brand}. {title}")
}

/// `W: 10cm, H: 5cm, D: 2cm`.
#[must_use]
pub fn format_dimensions(dimensions: &Dimensions) -> String {
    format!(
        "W: {}cm, H: {}cm, D: {}cm",
        dimensions.width.normalize(),
        dimensions.height.normalize(),
        dimensions.depth.normalize()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_rounds_half_up() {
        assert_eq!(format_price(Some(Decimal::new(10005, 3))), "$10.01");
        assert_eq!(format_price(Some(Decimal::from(3))), "$3.00");
    }

    #[test]
    fn test_discounted_price() {
        let price = Decimal::from(20);
        assert_eq!(discounted_price(price, Some(Decimal::from(25))), Decimal::from(15));
        assert_eq!(discounted_price(price, Some(Decimal::ZERO)), price);
        assert_eq!(discounted_price(price, None), price);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(Some(Decimal::new(1500, 2))), "15%");
        assert_eq!(format_percentage(None), "0%");
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("Inkwell", "Blue Pen"), "Inkwell. Blue Pen");
    }

    #[test]
    fn test_format_dimensions_strips_trailing_zeros() {
        let dimensions = Dimensions {
            width: Decimal::new(1000, 2),
            height: Decimal::new(55, 1),
            depth: Decimal::from(2),
        };
        assert_eq!(format_dimensions(&dimensions), "W: 10cm, H: 5.5cm, D: 2cm");
    }
}
