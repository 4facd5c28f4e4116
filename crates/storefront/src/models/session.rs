//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart (`deskshop_core::Cart`).
    pub const CART: &str = "cart";
}
