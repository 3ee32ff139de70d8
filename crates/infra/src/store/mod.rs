//! Key-value storage for whole-collection JSON snapshots.

pub mod in_memory;
pub mod json_dir;

use std::sync::Arc;

use crate::error::StoreError;

pub use in_memory::InMemoryStore;
pub use json_dir::JsonDirStore;

/// Collection keys. One JSON document per key.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_SESSION: &str = "current-session";
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const BRANDS: &str = "brands";
    pub const INVOICES: &str = "invoices";
    pub const PURCHASE_ORDERS: &str = "purchase-orders";
    pub const RETURNS: &str = "returns";
}

/// String-keyed, string-valued store. Last write wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
