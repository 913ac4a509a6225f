//! # Store Events
//!
//! Broadcast notifications emitted after mutations, so concurrently
//! rendered views (header cart badge, cart page) can refresh without
//! polling. The channel carries no payload beyond the event kind;
//! subscribers re-read the collection they care about.

use serde::{Deserialize, Serialize};

/// An event broadcast by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreEvent {
    /// The cart collection changed: add, quantity update, remove,
    /// clear, or a checkout that cleared it.
    CartChanged,
}
