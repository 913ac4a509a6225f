//! # Service Module
//!
//! Typed services over the collection store.
//!
//! ## Service Pattern
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Caller                                                      │
//! │     │  store.catalog().update(id, patch)                     │
//! │     ▼                                                        │
//! │  CatalogService                                              │
//! │  ├── read `products` collection (seeding on first access)    │
//! │  ├── apply the mutation in memory                            │
//! │  └── write the full collection back                          │
//! │     │                                                        │
//! │     ▼                                                        │
//! │  collections table (SQLite)                                  │
//! │                                                              │
//! │  Every operation is one synchronous read-modify-write; no    │
//! │  other operation interleaves inside one process.             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Services
//!
//! - [`catalog::CatalogService`] - product CRUD, stock toggle, filtering
//! - [`cart::CartService`] - cart mutations and totals
//! - [`orders::OrderService`] - order creation, checkout, status workflow
//! - [`session::SessionService`] - operator login/logout

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod session;
