//! # Cart
//!
//! The shopping cart and its merge semantics.
//!
//! ## Identity Key
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Entries are keyed by (product.id, size, color).             │
//! │                                                              │
//! │  add(комбінезон, 0-3m, білий, qty 2)   ─► new entry, qty 2   │
//! │  add(комбінезон, 0-3m, білий, qty 2)   ─► same entry, qty 4  │
//! │  add(комбінезон, 3-6m, білий, qty 1)   ─► new entry (size    │
//! │                                            differs)          │
//! │                                                              │
//! │  At most one entry per identity key at any time.             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry embeds a value snapshot of the product taken at add time;
//! later catalog edits do not reach into carts or orders.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation;
use crate::{MAX_CART_ENTRIES, MAX_ITEM_QUANTITY};

/// An entry in the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product snapshot at add time; never re-fetched.
    pub product: Product,

    /// Quantity, always positive.
    pub quantity: i64,

    /// Chosen size, a member of `product.sizes` at add time.
    pub size: String,

    /// Chosen color, a member of `product.colors` at add time.
    pub color: String,
}

impl CartItem {
    /// Whether this entry matches the given identity key.
    pub fn matches(&self, product_id: &str, size: &str, color: &str) -> bool {
        self.product.id == product_id && self.size == size && self.color == color
    }

    /// Line total: snapshot price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - At most one entry per (product id, size, color) identity key
/// - Every quantity is positive; setting a quantity to zero removes
///   the entry
///
/// Serializes transparently as the entry array, which is the persisted
/// layout of the `cart` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Returns the entries in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds an entry, merging by identity key.
    ///
    /// ## Behavior
    /// - Existing identity key: quantity increases by `item.quantity`
    /// - Otherwise: appended as a new entry
    ///
    /// The chosen size and color must be members of the snapshot
    /// product's vocabularies; this is checked here, at add time, and
    /// never re-validated afterwards.
    pub fn add(&mut self, item: CartItem) -> CoreResult<()> {
        validation::validate_quantity(item.quantity)?;
        if !item.product.sizes.iter().any(|s| s == &item.size) {
            return Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                value: item.size,
            }
            .into());
        }
        if !item.product.colors.iter().any(|c| c == &item.color) {
            return Err(ValidationError::NotAllowed {
                field: "color".to_string(),
                value: item.color,
            }
            .into());
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|e| e.matches(&item.product.id, &item.size, &item.color))
        {
            let merged = existing.quantity + item.quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = merged;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ENTRIES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ENTRIES,
            });
        }

        self.items.push(item);
        Ok(())
    }

    /// Sets the quantity of the entry with the given identity key.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the entry
    /// - Absent key: no-op
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        size: &str,
        color: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove(product_id, size, color);
            return Ok(());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(entry) = self
            .items
            .iter_mut()
            .find(|e| e.matches(product_id, size, color))
        {
            entry.quantity = quantity;
        }
        Ok(())
    }

    /// Removes the entry with the given identity key; no-op if absent.
    pub fn remove(&mut self, product_id: &str, size: &str, color: &str) {
        self.items.retain(|e| !e.matches(product_id, size, color));
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct entries.
    pub fn entry_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all entries.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|e| e.quantity).sum()
    }

    /// Sum of line totals across all entries. Derived, never stored.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the cart, returning the entries.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

/// Cart totals summary for display layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub entry_count: usize,
    pub total_quantity: i64,
    pub total_amount: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            entry_count: cart.entry_count(),
            total_quantity: cart.total_quantity(),
            total_amount: cart.total_amount(),
        }
    }
}
