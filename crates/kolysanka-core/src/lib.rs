//! # kolysanka-core: Pure Domain Logic for the Kolysanka Storefront
//!
//! This crate is the heart of the storefront. It contains the domain
//! types and business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Kolysanka Architecture                      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │           UI layer (out of this repository)            │  │
//! │  │   Catalog pages ─► Cart ─► Checkout ─► Admin panel     │  │
//! │  └───────────────────────────┬────────────────────────────┘  │
//! │                              │                               │
//! │  ┌───────────────────────────▼────────────────────────────┐  │
//! │  │              ★ kolysanka-core (THIS CRATE) ★           │  │
//! │  │                                                        │  │
//! │  │  ┌────────┐ ┌───────┐ ┌──────┐ ┌────────────┐          │  │
//! │  │  │ types  │ │ money │ │ cart │ │ validation │          │  │
//! │  │  └────────┘ └───────┘ └──────┘ └────────────┘          │  │
//! │  │                                                        │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS    │  │
//! │  └───────────────────────────┬────────────────────────────┘  │
//! │                              │                               │
//! │  ┌───────────────────────────▼────────────────────────────┐  │
//! │  │         kolysanka-store (persistence layer)            │  │
//! │  │       SQLite collections, migrations, services         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (Product, Order, AdminUser, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point)
//! - [`cart`] - Cart with upsert-by-identity-key merge semantics
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum number of distinct entries in a single cart.
///
/// Keeps a runaway cart from growing the persisted blob without bound.
pub const MAX_CART_ENTRIES: usize = 100;

/// Maximum quantity of a single cart entry.
pub const MAX_ITEM_QUANTITY: i64 = 999;
