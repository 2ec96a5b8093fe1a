//! sea-orm backed [`Repository`] for every domain entity.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::{NotSet, Set, Unchanged}, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use models::{court, management, prison, user};

use crate::domain::{Court, Entity, Management, Prison, User};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::repository::{Repository, UserRepository};

/// Repository over any sea-orm connection: the pool for one-shot calls, a
/// `DatabaseTransaction` when running inside a unit of work.
pub struct SeaOrmRepository<'c, C, T> {
    conn: &'c C,
    _entity: PhantomData<fn() -> T>,
}

impl<'c, C: ConnectionTrait, T: Entity> SeaOrmRepository<'c, C, T> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn, _entity: PhantomData }
    }
}

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

fn update_error(entity: &str, id: i32, err: DbErr) -> ServiceError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => ServiceError::not_found(entity, id),
        other => ServiceError::from_db(entity, other),
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        User::new(m.first_name, m.last_name, m.email, m.phone_number).with_id(m.id)
    }
}

fn user_active_model(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        first_name: Set(u.first_name().to_string()),
        last_name: Set(u.last_name().to_string()),
        email: Set(u.email().to_string()),
        phone_number: Set(u.phone_number().to_string()),
        ..Default::default()
    }
}

impl From<prison::Model> for Prison {
    fn from(m: prison::Model) -> Self {
        Prison::new(m.name, m.code, m.location, m.capacity).with_id(m.id)
    }
}

fn prison_active_model(p: &Prison) -> prison::ActiveModel {
    prison::ActiveModel {
        name: Set(p.name.clone()),
        code: Set(p.code.clone()),
        location: Set(p.location.clone()),
        capacity: Set(p.capacity),
        ..Default::default()
    }
}

impl From<management::Model> for Management {
    fn from(m: management::Model) -> Self {
        Management::new(m.name, m.description).with_id(m.id)
    }
}

fn management_active_model(m: &Management) -> management::ActiveModel {
    management::ActiveModel {
        name: Set(m.name.clone()),
        description: Set(m.description.clone()),
        ..Default::default()
    }
}

impl From<court::Model> for Court {
    fn from(m: court::Model) -> Self {
        Court::new(m.name, m.location).with_id(m.id)
    }
}

fn court_active_model(c: &Court) -> court::ActiveModel {
    court::ActiveModel {
        name: Set(c.name.clone()),
        location: Set(c.location.clone()),
        ..Default::default()
    }
}

/// Implements [`Repository`] for one domain type over its sea-orm entity
/// module. Audit columns are maintained here, never by callers.
macro_rules! seaorm_repository {
    ($domain:ty, $module:ident, $to_active:path) => {
        #[async_trait]
        impl<'c, C> Repository<$domain> for SeaOrmRepository<'c, C, $domain>
        where
            C: ConnectionTrait + Sync,
        {
            async fn add(&self, entity: $domain) -> Result<$domain, ServiceError> {
                let stamp = now();
                let mut am = $to_active(&entity);
                am.id = NotSet;
                am.created_at = Set(stamp);
                am.updated_at = Set(stamp);
                let model = am
                    .insert(self.conn)
                    .await
                    .map_err(|e| ServiceError::from_db(<$domain>::NAME, e))?;
                debug!(entity = <$domain>::NAME, id = model.id, "row inserted");
                Ok(model.into())
            }

            async fn update(&self, entity: $domain) -> Result<$domain, ServiceError> {
                let id = entity.id();
                let exists = $module::Entity::find_by_id(id)
                    .one(self.conn)
                    .await
                    .map_err(|e| ServiceError::from_db(<$domain>::NAME, e))?
                    .is_some();
                if !exists {
                    return Err(ServiceError::not_found(<$domain>::NAME, id));
                }
                let mut am = $to_active(&entity);
                am.id = Unchanged(id);
                am.updated_at = Set(now());
                let model = am
                    .update(self.conn)
                    .await
                    .map_err(|e| update_error(<$domain>::NAME, id, e))?;
                debug!(entity = <$domain>::NAME, id, "row updated");
                Ok(model.into())
            }

            async fn delete(&self, id: i32) -> Result<(), ServiceError> {
                let res = $module::Entity::delete_by_id(id)
                    .exec(self.conn)
                    .await
                    .map_err(|e| ServiceError::from_db(<$domain>::NAME, e))?;
                if res.rows_affected == 0 {
                    return Err(ServiceError::not_found(<$domain>::NAME, id));
                }
                debug!(entity = <$domain>::NAME, id, "row deleted");
                Ok(())
            }

            async fn get_by_id(&self, id: i32) -> Result<$domain, ServiceError> {
                $module::Entity::find_by_id(id)
                    .one(self.conn)
                    .await
                    .map_err(|e| ServiceError::from_db(<$domain>::NAME, e))?
                    .map(Into::into)
                    .ok_or_else(|| ServiceError::not_found(<$domain>::NAME, id))
            }

            async fn get_all(&self) -> Result<Vec<$domain>, ServiceError> {
                let rows = $module::Entity::find()
                    .order_by_asc($module::Column::Id)
                    .all(self.conn)
                    .await
                    .map_err(|e| ServiceError::from_db(<$domain>::NAME, e))?;
                Ok(rows.into_iter().map(Into::into).collect())
            }

            async fn get_page(&self, page: Pagination) -> Result<Vec<$domain>, ServiceError> {
                let (_, per_page) = page.normalize();
                let rows = $module::Entity::find()
                    .order_by_asc($module::Column::Id)
                    .offset(page.offset())
                    .limit(per_page)
                    .all(self.conn)
                    .await
                    .map_err(|e| ServiceError::from_db(<$domain>::NAME, e))?;
                Ok(rows.into_iter().map(Into::into).collect())
            }
        }
    };
}

seaorm_repository!(User, user, user_active_model);
seaorm_repository!(Prison, prison, prison_active_model);
seaorm_repository!(Management, management, management_active_model);
seaorm_repository!(Court, court, court_active_model);

#[async_trait]
impl<'c, C> UserRepository for SeaOrmRepository<'c, C, User>
where
    C: ConnectionTrait + Sync,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let row = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.conn)
            .await
            .map_err(|e| ServiceError::from_db(User::NAME, e))?;
        Ok(row.map(Into::into))
    }
}
