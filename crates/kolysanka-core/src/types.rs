//! # Record Types
//!
//! Core record types for the Kolysanka storefront.
//!
//! ## Type Overview
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Record Types                           │
//! │                                                              │
//! │  ┌───────────────┐  ┌───────────────┐  ┌─────────────────┐   │
//! │  │   Product     │  │     Order     │  │   AdminUser     │   │
//! │  │  ───────────  │  │  ───────────  │  │  ─────────────  │   │
//! │  │  id (UUID)    │  │  id (UUID)    │  │  id             │   │
//! │  │  price        │  │  order_number │  │  username       │   │
//! │  │  category     │  │  status       │  │  password_hash  │   │
//! │  │  sizes/colors │  │  total_amount │  └─────────────────┘   │
//! │  └───────────────┘  └───────────────┘                        │
//! │                                                              │
//! │  ┌───────────────┐  ┌───────────────┐                        │
//! │  │  OrderStatus  │  │ AdminSession  │                        │
//! │  │  ───────────  │  │  ───────────  │                        │
//! │  │  Pending      │  │  token        │                        │
//! │  │  ...          │  │  expires_at   │                        │
//! │  │  Cancelled    │  └───────────────┘                        │
//! │  └───────────────┘                                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All persisted types serialize as camelCase JSON; the stored layout is
//! the wire format the UI layer consumes directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::CartItem;
use crate::error::CoreResult;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Vocabularies
// =============================================================================

/// The size vocabulary products may offer.
///
/// Age ranges for the youngest, letter sizes for older kids.
pub const SIZES: &[&str] = &[
    "0-3m", "3-6m", "6-12m", "1-2y", "2-3y", "3-4y", "4-5y", "5-6y", "XS", "S", "M", "L", "XL",
];

/// The color vocabulary products may offer.
pub const COLORS: &[&str] = &[
    "білий",
    "чорний",
    "сірий",
    "синій",
    "рожевий",
    "жовтий",
    "зелений",
    "червоний",
    "фіолетовий",
    "помаранчевий",
];

// =============================================================================
// Category
// =============================================================================

/// Product category, a closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Newborn,
    Boys,
    Girls,
    Toddlers,
    Accessories,
    Shoes,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Newborn,
        Category::Boys,
        Category::Girls,
        Category::Toddlers,
        Category::Accessories,
        Category::Shoes,
    ];

    /// Stable machine name, matching the persisted serde form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Newborn => "newborn",
            Category::Boys => "boys",
            Category::Girls => "girls",
            Category::Toddlers => "toddlers",
            Category::Accessories => "accessories",
            Category::Shoes => "shoes",
        }
    }

    /// Customer-facing label.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Newborn => "Новонароджені",
            Category::Boys => "Для хлопчиків",
            Category::Girls => "Для дівчаток",
            Category::Toddlers => "Малюки",
            Category::Accessories => "Аксесуари",
            Category::Shoes => "Взуття",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4), assigned at creation and never reused.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Longer description for the product page.
    pub description: String,

    /// Unit price in minor units.
    pub price: Money,

    /// Ordered image URIs; empty means the UI shows a placeholder.
    pub images: Vec<String>,

    /// Category, one of the closed enumeration.
    pub category: Category,

    /// Offered sizes, a non-empty subset of [`SIZES`].
    pub sizes: Vec<String>,

    /// Offered colors, a non-empty subset of [`COLORS`].
    pub colors: Vec<String>,

    /// Whether the product is currently offered for sale.
    pub in_stock: bool,

    /// Units on hand. Informational; never blocks a sale.
    pub stock_quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated. Invariant: >= created_at.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product. Id and timestamps are assigned by the
/// catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub images: Vec<String>,
    pub category: Category,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub in_stock: bool,
    pub stock_quantity: i64,
}

impl NewProduct {
    /// Validates all fields against the catalog rules.
    pub fn validate(&self) -> CoreResult<()> {
        validation::validate_product_name(&self.name)?;
        validation::validate_price(self.price)?;
        validation::validate_sizes(&self.sizes)?;
        validation::validate_colors(&self.colors)?;
        validation::validate_stock_quantity(self.stock_quantity)?;
        Ok(())
    }

    /// Builds the full record with the assigned id and timestamps.
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            images: self.images,
            category: self.category,
            sizes: self.sizes,
            colors: self.colors,
            in_stock: self.in_stock,
            stock_quantity: self.stock_quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a product. Only supplied fields are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub images: Option<Vec<String>>,
    pub category: Option<Category>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub in_stock: Option<bool>,
    pub stock_quantity: Option<i64>,
}

impl ProductPatch {
    /// Validates the supplied fields; absent fields are not checked.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(name) = &self.name {
            validation::validate_product_name(name)?;
        }
        if let Some(price) = self.price {
            validation::validate_price(price)?;
        }
        if let Some(sizes) = &self.sizes {
            validation::validate_sizes(sizes)?;
        }
        if let Some(colors) = &self.colors {
            validation::validate_colors(colors)?;
        }
        if let Some(qty) = self.stock_quantity {
            validation::validate_stock_quantity(qty)?;
        }
        Ok(())
    }

    /// Merges the supplied fields into `product` and refreshes updated_at.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(sizes) = self.sizes {
            product.sizes = sizes;
        }
        if let Some(colors) = self.colors {
            product.colors = colors;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(stock_quantity) = self.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        product.updated_at = now;
    }
}

// =============================================================================
// Product Filter
// =============================================================================

/// Catalog filter: free-text search, category, price range, availability.
///
/// All criteria are conjunctive; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    pub category: Option<Category>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
    /// When true, only products currently offered for sale.
    pub in_stock_only: bool,
}

impl ProductFilter {
    /// Checks whether a product satisfies every set criterion.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !product.name.to_lowercase().contains(&term)
                && !product.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if self.in_stock_only && !product.in_stock {
            return false;
        }
        true
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a customer order.
///
/// ## Transition Table
/// ```text
/// Pending ──► Confirmed ──► Processing ──► Shipped ──► Delivered
///    │            │              │            │
///    └────────────┴──────────────┴────────────┴──────► Cancelled
///
/// Delivered and Cancelled are terminal.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order recorded, awaiting operator confirmation.
    Pending,
    /// Operator confirmed the order with the customer.
    Confirmed,
    /// Being picked and packed.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Stable machine name, matching the persisted serde form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are possible.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the transition table permits moving to `next`.
    ///
    /// Cancellation is reachable from every non-terminal status; the
    /// fulfilment path advances one stage at a time.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Confirmed)
            | (OrderStatus::Confirmed, OrderStatus::Processing)
            | (OrderStatus::Processing, OrderStatus::Shipped)
            | (OrderStatus::Shipped, OrderStatus::Delivered) => true,
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Whether this status counts towards realized revenue.
    pub const fn counts_as_revenue(&self) -> bool {
        matches!(
            self,
            OrderStatus::Confirmed
                | OrderStatus::Processing
                | OrderStatus::Shipped
                | OrderStatus::Delivered
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// Customer contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl CustomerInfo {
    /// Validates required contact fields.
    pub fn validate(&self) -> CoreResult<()> {
        validation::validate_customer_name(&self.name)?;
        validation::validate_phone(&self.phone)?;
        if let Some(email) = &self.email {
            validation::validate_email(email)?;
        }
        Ok(())
    }
}

/// A customer order.
///
/// Items are value snapshots of cart entries at checkout time and are
/// immutable after creation; `total_amount` is computed once from the
/// snapshot and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-facing reference the customer quotes when contacting the
    /// seller, e.g. `ORD-1754640000000-482`.
    pub order_number: String,

    /// Snapshot of the cart entries at checkout.
    pub items: Vec<CartItem>,

    /// Sum of item price × quantity at creation time.
    pub total_amount: Money,

    pub customer: CustomerInfo,

    pub status: OrderStatus,

    /// When the order was recorded. Immutable.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Admin
// =============================================================================

/// The single operator account.
///
/// The stored record carries only the Argon2 hash; the plaintext
/// password never persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

/// An authenticated operator session.
///
/// `is_authenticated` is true iff a session record exists and has not
/// expired; there is no refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    /// Opaque session token (UUID v4).
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Whether the session is still valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Світшот для хлопчиків".to_string(),
            description: "Стильний світшот з капюшоном".to_string(),
            price: Money::from_major(650),
            images: vec![],
            category: Category::Boys,
            sizes: vec!["2-3y".to_string(), "3-4y".to_string()],
            colors: vec!["синій".to_string()],
            in_stock: true,
            stock_quantity: 20,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_fulfilment_path() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_status_no_stage_skipping() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_status_cancellation_from_any_non_terminal() {
        for status in OrderStatus::ALL {
            assert_eq!(
                status.can_transition_to(OrderStatus::Cancelled),
                !status.is_terminal()
            );
        }
    }

    #[test]
    fn test_status_terminal_states_are_final() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_serde_form() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");

        let back: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(back, OrderStatus::Shipped);
    }

    #[test]
    fn test_category_serde_matches_as_str() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_product_json_round_trip() {
        let product = sample_product();
        let json = serde_json::to_string(&product).unwrap();

        // Persisted layout is camelCase
        assert!(json.contains("\"inStock\""));
        assert!(json.contains("\"stockQuantity\""));
        assert!(json.contains("\"createdAt\""));

        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut product = sample_product();
        let before = product.clone();
        let later = Utc::now();

        let patch = ProductPatch {
            price: Some(Money::from_major(700)),
            in_stock: Some(false),
            ..ProductPatch::default()
        };
        patch.apply(&mut product, later);

        assert_eq!(product.price, Money::from_major(700));
        assert!(!product.in_stock);
        assert_eq!(product.name, before.name);
        assert_eq!(product.sizes, before.sizes);
        assert_eq!(product.created_at, before.created_at);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let product = sample_product();

        let filter = ProductFilter {
            search: Some("СВІТШОТ".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product));

        let filter = ProductFilter {
            search: Some("плаття".to_string()),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));
    }

    #[test]
    fn test_filter_category_and_price_range() {
        let product = sample_product();

        let filter = ProductFilter {
            category: Some(Category::Girls),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));

        let filter = ProductFilter {
            min_price: Some(Money::from_major(500)),
            max_price: Some(Money::from_major(700)),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product));

        let filter = ProductFilter {
            max_price: Some(Money::from_major(500)),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));
    }

    #[test]
    fn test_filter_in_stock_only() {
        let mut product = sample_product();
        product.in_stock = false;

        let filter = ProductFilter {
            in_stock_only: true,
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));
        assert!(ProductFilter::default().matches(&product));
    }

    #[test]
    fn test_session_validity() {
        let now = Utc::now();
        let session = AdminSession {
            token: "t".to_string(),
            issued_at: now,
            expires_at: now + chrono::Duration::hours(12),
        };

        assert!(session.is_valid_at(now));
        assert!(!session.is_valid_at(now + chrono::Duration::hours(13)));
    }
}
