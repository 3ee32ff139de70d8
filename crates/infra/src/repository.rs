//! Per-collection repositories over a [`KeyValueStore`].
//!
//! Each collection is read once when opened and held in memory. Every
//! mutation rewrites the whole collection (last write wins).

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use invoiceflow_core::{DomainError, Entity};

use crate::error::{ServiceResult, StoreError};
use crate::store::KeyValueStore;

/// CRUD-shaped access to one collection, in insertion order.
pub trait Repository<T: Entity> {
    fn list(&self) -> &[T];

    fn get(&self, id: &T::Id) -> Option<&T>;

    /// Append a record. A record with the same id is a `Conflict`.
    fn insert(&mut self, item: T) -> ServiceResult<()>;

    /// Replace the record with the same id, returning the previous version.
    fn update(&mut self, item: T) -> ServiceResult<T>;

    /// Delete by id, returning the removed record.
    fn remove(&mut self, id: &T::Id) -> ServiceResult<T>;

    /// Swap the whole collection (used after bulk stock moves).
    fn replace_all(&mut self, items: Vec<T>) -> ServiceResult<()>;

    fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }
}

/// Whole-collection snapshot persisted as one JSON array under `key`.
pub struct SnapshotRepository<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    items: Vec<T>,
}

impl<T> std::fmt::Debug for SnapshotRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRepository")
            .field("key", &self.key)
            .field("len", &self.items.len())
            .finish()
    }
}

impl<T> SnapshotRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
    T::Id: Display,
{
    /// Load `key` from the store.
    ///
    /// A missing key is filled from `seed` and written back. Unreadable data
    /// also falls back to `seed` (logged at warn) but is left on disk until
    /// the next mutation overwrites it.
    pub fn open<F>(store: Arc<dyn KeyValueStore>, key: &'static str, seed: F) -> ServiceResult<Self>
    where
        F: FnOnce() -> ServiceResult<Vec<T>>,
    {
        let items = match store.get(key)? {
            None => {
                let items = seed()?;
                let repo = Self { store, key, items };
                repo.persist(&repo.items)?;
                return Ok(repo);
            }
            Some(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => items,
                Err(err) => {
                    tracing::warn!(key, error = %err, "stored collection unreadable; using defaults");
                    seed()?
                }
            },
        };
        Ok(Self { store, key, items })
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    fn persist(&self, items: &[T]) -> ServiceResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| StoreError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.store.set(self.key, &raw)?;
        Ok(())
    }

    /// Write `items`, and only then make them the in-memory state.
    fn commit(&mut self, items: Vec<T>) -> ServiceResult<()> {
        self.persist(&items)?;
        self.items = items;
        Ok(())
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn missing(&self, id: &T::Id) -> DomainError {
        DomainError::not_found(self.key, id)
    }
}

impl<T> Repository<T> for SnapshotRepository<T>
where
    T: Entity + Clone + Serialize + DeserializeOwned,
    T::Id: Display,
{
    fn list(&self) -> &[T] {
        &self.items
    }

    fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn insert(&mut self, item: T) -> ServiceResult<()> {
        if self.position(item.id()).is_some() {
            return Err(DomainError::conflict(format!(
                "{} already contains {}",
                self.key,
                item.id()
            ))
            .into());
        }
        let mut next = self.items.clone();
        next.push(item);
        self.commit(next)
    }

    fn update(&mut self, item: T) -> ServiceResult<T> {
        let idx = self
            .position(item.id())
            .ok_or_else(|| self.missing(item.id()))?;
        let mut next = self.items.clone();
        let previous = std::mem::replace(&mut next[idx], item);
        self.commit(next)?;
        Ok(previous)
    }

    fn remove(&mut self, id: &T::Id) -> ServiceResult<T> {
        let idx = self.position(id).ok_or_else(|| self.missing(id))?;
        let mut next = self.items.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(removed)
    }

    fn replace_all(&mut self, items: Vec<T>) -> ServiceResult<()> {
        self.commit(items)
    }
}
