//! Generic persistence contract.
//!
//! One trait serves every entity type; [`crate::repo::seaorm`] backs it
//! with the database, [`memory`] with a map for tests and doc examples.

use async_trait::async_trait;

use crate::domain::{Entity, User};
use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// CRUD over the store of `T`. Consistency is the store's job; callers that
/// need several writes to land together use a [`crate::unit_of_work::UnitOfWork`].
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert `entity` and return it with the id the store assigned.
    async fn add(&self, entity: T) -> Result<T, ServiceError>;
    /// Replace the row keyed by `entity.id()`; `NotFound` when absent.
    async fn update(&self, entity: T) -> Result<T, ServiceError>;
    /// Remove by id; `NotFound` when absent.
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<T, ServiceError>;
    /// Every row, ascending id.
    async fn get_all(&self) -> Result<Vec<T>, ServiceError>;
    /// One bounded page, ascending id.
    async fn get_page(&self, page: Pagination) -> Result<Vec<T>, ServiceError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Case-insensitive lookup; emails are stored lower-cased.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    pub struct InMemoryRepository<T> {
        rows: Mutex<Store<T>>,
    }

    struct Store<T> {
        next_id: i32,
        rows: BTreeMap<i32, T>,
    }

    impl<T> Default for InMemoryRepository<T> {
        fn default() -> Self {
            Self { rows: Mutex::new(Store { next_id: 1, rows: BTreeMap::new() }) }
        }
    }

    impl<T> InMemoryRepository<T> {
        pub fn new() -> Self {
            Self::default()
        }

        fn store(&self) -> MutexGuard<'_, Store<T>> {
            self.rows.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn len(&self) -> usize {
            self.store().rows.len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl<T: Entity> Repository<T> for InMemoryRepository<T> {
        async fn add(&self, entity: T) -> Result<T, ServiceError> {
            let mut store = self.store();
            let id = store.next_id;
            store.next_id += 1;
            let stored = entity.with_id(id);
            store.rows.insert(id, stored.clone());
            Ok(stored)
        }

        async fn update(&self, entity: T) -> Result<T, ServiceError> {
            let mut store = self.store();
            match store.rows.get_mut(&entity.id()) {
                Some(row) => {
                    *row = entity.clone();
                    Ok(entity)
                }
                None => Err(ServiceError::not_found(T::NAME, entity.id())),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.store()
                .rows
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::not_found(T::NAME, id))
        }

        async fn get_by_id(&self, id: i32) -> Result<T, ServiceError> {
            self.store()
                .rows
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(T::NAME, id))
        }

        async fn get_all(&self) -> Result<Vec<T>, ServiceError> {
            Ok(self.store().rows.values().cloned().collect())
        }

        async fn get_page(&self, page: Pagination) -> Result<Vec<T>, ServiceError> {
            let (_, per_page) = page.normalize();
            Ok(self
                .store()
                .rows
                .values()
                .skip(page.offset() as usize)
                .take(per_page as usize)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryRepository<User> {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
            let needle = email.trim().to_lowercase();
            Ok(self.store().rows.values().find(|u| u.email() == needle).cloned())
        }
    }
}
