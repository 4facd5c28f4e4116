//! Cart state.
//!
//! A [`Cart`] is a plain value owned by one visitor session. Every change
//! goes through [`Cart::apply`] with a [`CartAction`], so the storefront
//! handlers never reach into the line list directly.
//!
//! Each line keeps the price and stock seen when the product was added.
//! Totals are computed from that snapshot, not from live product data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// Product data captured when a line is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub thumbnail: String,
    pub stock: u32,
}

impl NewCartItem {
    /// Snapshot a stored product for the cart.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.record.title.clone(),
            price: product.record.price,
            thumbnail: product.thumbnail().unwrap_or_default().to_owned(),
            stock: product.record.stock,
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub thumbnail: String,
    pub stock: u32,
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A change to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `quantity` of a product, merging into an existing line.
    Add { item: NewCartItem, quantity: u32 },
    /// One more of an existing line.
    Increase(ProductId),
    /// One fewer of an existing line, never below one.
    Decrease(ProductId),
    /// Drop a line whatever its quantity.
    Remove(ProductId),
    /// Drop every line.
    Clear,
}

/// Line items for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Apply an action to the cart.
    ///
    /// Actions naming a product that has no line are no-ops, as is adding a
    /// quantity of zero. The cart does not cap quantities against stock;
    /// callers do that with [`addable_quantity`] before adding.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add { item, quantity } => self.add(item, quantity),
            CartAction::Increase(id) => {
                if let Some(line) = self.line_mut(&id) {
                    line.quantity = line.quantity.saturating_add(1);
                }
            }
            CartAction::Decrease(id) => {
                if let Some(line) = self.line_mut(&id) {
                    if line.quantity > 1 {
                        line.quantity -= 1;
                    }
                }
            }
            CartAction::Remove(id) => self.lines.retain(|line| line.id != id),
            CartAction::Clear => self.lines.clear(),
        }
    }

    fn add(&mut self, item: NewCartItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }
        self.lines.push(CartItem {
            id: item.id,
            name: item.name,
            price: item.price,
            thumbnail: item.thumbnail,
            stock: item.stock,
            quantity,
        });
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartItem> {
        self.lines.iter().find(|line| &line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price × quantity` across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartItem::line_total).sum()
    }
}

/// How many of `requested` can still be added without exceeding `stock`,
/// given `in_cart` already on the line.
#[must_use]
pub const fn addable_quantity(requested: u32, stock: u32, in_cart: u32) -> u32 {
    let room = stock.saturating_sub(in_cart);
    if requested < room { requested } else { room }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::fixtures;

    fn item(id: &str, price: i64, stock: u32) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            thumbnail: format!("https://cdn.example.com/{id}.jpg"),
            stock,
        }
    }

    fn add(cart: &mut Cart, item: NewCartItem, quantity: u32) {
        cart.apply(CartAction::Add { item, quantity });
    }

    #[test]
    fn test_add_merges_into_existing_line() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 2);
        add(&mut cart, item("p1", 10, 5), 3);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&ProductId::new("p1")).unwrap().quantity, 5);
        assert_eq!(cart.total_price(), Decimal::from(50));
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_add_keeps_first_price_snapshot() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 1);
        add(&mut cart, item("p1", 99, 5), 1);

        assert_eq!(cart.total_price(), Decimal::from(20));
    }

    #[test]
    fn test_add_zero_is_ignored() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrease_floors_at_one() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 2);

        let id = ProductId::new("p1");
        cart.apply(CartAction::Decrease(id.clone()));
        cart.apply(CartAction::Decrease(id.clone()));
        cart.apply(CartAction::Decrease(id.clone()));

        assert_eq!(cart.line(&id).unwrap().quantity, 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_drops_line_regardless_of_quantity() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 4);
        add(&mut cart, item("p2", 3, 5), 1);

        cart.apply(CartAction::Remove(ProductId::new("p1")));

        assert!(cart.line(&ProductId::new("p1")).is_none());
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_increase_and_unknown_ids() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 1);

        cart.apply(CartAction::Increase(ProductId::new("p1")));
        cart.apply(CartAction::Increase(ProductId::new("missing")));
        cart.apply(CartAction::Decrease(ProductId::new("missing")));

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear_and_totals_over_lines() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 2);
        add(&mut cart, item("p2", 3, 5), 3);
        assert_eq!(cart.total_price(), Decimal::from(29));

        cart.apply(CartAction::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_addable_quantity() {
        assert_eq!(addable_quantity(2, 5, 0), 2);
        assert_eq!(addable_quantity(4, 5, 3), 2);
        assert_eq!(addable_quantity(1, 5, 5), 0);
        assert_eq!(addable_quantity(3, 2, 7), 0);
    }

    #[test]
    fn test_snapshot_from_product() {
        let product = fixtures::product("p1", "Blue Pen");
        let item = NewCartItem::from_product(&product);

        assert_eq!(item.name, "Blue Pen");
        assert_eq!(item.price, Decimal::new(1250, 2));
        assert_eq!(item.stock, 40);
        assert_eq!(item.thumbnail, "https://cdn.example.com/products/blue-pen.jpg");
    }

    #[test]
    fn test_cart_survives_serialization() {
        let mut cart = Cart::new();
        add(&mut cart, item("p1", 10, 5), 2);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
