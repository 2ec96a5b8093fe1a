use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use models::{user, user_credentials, user_permission};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AccountRepository;

/// Account persistence on the shared pool.
#[derive(Clone)]
pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_auth_user(m: user::Model) -> AuthUser {
    AuthUser { id: m.id, name: format!("{} {}", m.first_name, m.last_name), email: m.email }
}

fn to_credentials(m: user_credentials::Model) -> Credentials {
    Credentials { user_id: m.user_id, password_hash: m.password_hash, password_algorithm: m.password_algorithm }
}

fn db_err(e: sea_orm::DbErr) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let row = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(to_auth_user))
    }

    async fn user_exists(&self, user_id: i32) -> Result<bool, AuthError> {
        let row = user::Entity::find_by_id(user_id).one(&self.db).await.map_err(db_err)?;
        Ok(row.is_some())
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        Ok(user_credentials::find_by_user(&self.db, user_id).await?.map(to_credentials))
    }

    async fn upsert_password(&self, user_id: i32, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let row = user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm).await?;
        Ok(to_credentials(row))
    }

    async fn permissions(&self, user_id: i32) -> Result<Vec<String>, AuthError> {
        Ok(user_permission::list_for_user(&self.db, user_id).await?)
    }

    async fn replace_permissions(&self, user_id: i32, permissions: &[String]) -> Result<(), AuthError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        user_permission::replace_for_user(&txn, user_id, permissions).await?;
        txn.commit().await.map_err(db_err)
    }
}
