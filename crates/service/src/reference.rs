//! CRUD over reference data (prisons, managements, courts).
//!
//! These records have no workflow of their own, so the operations are thin
//! generic functions: validate, then hand off to the repository.

use tracing::{info, instrument};

use crate::auth::permissions;
use crate::domain::reference::Validate;
use crate::domain::{Court, Entity, Management, Prison};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::repository::Repository;

/// A reference entity together with the permission module guarding it.
pub trait Reference: Entity + Validate {
    const MODULE: &'static str;
}

impl Reference for Prison {
    const MODULE: &'static str = permissions::PRISONS;
}

impl Reference for Management {
    const MODULE: &'static str = permissions::MANAGEMENTS;
}

impl Reference for Court {
    const MODULE: &'static str = permissions::COURTS;
}

#[instrument(skip_all, fields(entity = T::NAME))]
pub async fn create<T, R>(repo: &R, item: T) -> Result<T, ServiceError>
where
    T: Reference,
    R: Repository<T> + ?Sized,
{
    item.validate()?;
    let stored = repo.add(item).await?;
    info!(id = stored.id(), "reference_created");
    Ok(stored)
}

#[instrument(skip_all, fields(entity = T::NAME, id = id))]
pub async fn update<T, R>(repo: &R, id: i32, item: T) -> Result<T, ServiceError>
where
    T: Reference,
    R: Repository<T> + ?Sized,
{
    item.validate()?;
    repo.update(item.with_id(id)).await
}

pub async fn delete<T, R>(repo: &R, id: i32) -> Result<(), ServiceError>
where
    T: Reference,
    R: Repository<T> + ?Sized,
{
    repo.delete(id).await
}

pub async fn get<T, R>(repo: &R, id: i32) -> Result<T, ServiceError>
where
    T: Reference,
    R: Repository<T> + ?Sized,
{
    repo.get_by_id(id).await
}

pub async fn list<T, R>(repo: &R, page: Pagination) -> Result<Vec<T>, ServiceError>
where
    T: Reference,
    R: Repository<T> + ?Sized,
{
    repo.get_page(page).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryRepository;

    #[tokio::test]
    async fn invalid_records_never_reach_the_store() {
        let repo = InMemoryRepository::<Prison>::new();
        let err = create(&repo, Prison::new("", "K-1", "Kober", 10)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn update_targets_the_path_id() -> anyhow::Result<()> {
        let repo = InMemoryRepository::<Court>::new();
        let c = create(&repo, Court::new("High", "Khartoum")).await?;
        let updated = update(&repo, c.id(), Court::new("Supreme", "Khartoum")).await?;
        assert_eq!(updated.id(), c.id());
        assert_eq!(get::<Court, _>(&repo, c.id()).await?.name, "Supreme");
        assert_eq!(list::<Court, _>(&repo, Pagination::default()).await?.len(), 1);
        delete::<Court, _>(&repo, c.id()).await?;
        assert!(repo.is_empty());
        Ok(())
    }

    #[test]
    fn modules_match_the_permission_catalog() {
        assert!(permissions::MODULES.contains(&Prison::MODULE));
        assert!(permissions::MODULES.contains(&Management::MODULE));
        assert!(permissions::MODULES.contains(&Court::MODULE));
    }
}
