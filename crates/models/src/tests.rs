use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::{db, user, user_credentials, user_permission};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn insert_user(db: &DatabaseConnection, email: &str) -> Result<user::Model> {
    let now = Utc::now().into();
    let am = user::ActiveModel {
        first_name: Set("Amina".into()),
        last_name: Set("Yusuf".into()),
        email: Set(email.into()),
        phone_number: Set("+249912345678".into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn user_ids_are_assigned_by_the_database() -> Result<()> {
    let db = setup_test_db().await?;
    let a = insert_user(&db, "a@example.com").await?;
    let b = insert_user(&db, "b@example.com").await?;
    assert!(a.id > 0);
    assert!(b.id > a.id);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_violates_unique_constraint() -> Result<()> {
    let db = setup_test_db().await?;
    insert_user(&db, "dup@example.com").await?;
    let err = insert_user(&db, "dup@example.com").await.unwrap_err();
    let db_err = err.downcast::<sea_orm::DbErr>()?;
    assert!(matches!(db_err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))));
    Ok(())
}

#[tokio::test]
async fn upsert_password_inserts_then_replaces() -> Result<()> {
    let db = setup_test_db().await?;
    let u = insert_user(&db, "creds@example.com").await?;

    let first = user_credentials::upsert_password(&db, u.id, "hash-1".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.password_hash, "hash-2");

    let stored = user_credentials::find_by_user(&db, u.id).await?.unwrap();
    assert_eq!(stored.password_hash, "hash-2");

    let blank = user_credentials::upsert_password(&db, u.id, "  ".into(), "argon2").await;
    assert!(blank.is_err());
    Ok(())
}

#[tokio::test]
async fn permissions_are_replaced_atomically() -> Result<()> {
    let db = setup_test_db().await?;
    let u = insert_user(&db, "perms@example.com").await?;

    let first = vec!["Permissions.Users.View".to_string(), "Permissions.Courts.View".to_string()];
    user_permission::replace_for_user(&db, u.id, &first).await?;
    assert_eq!(
        user_permission::list_for_user(&db, u.id).await?,
        vec!["Permissions.Courts.View".to_string(), "Permissions.Users.View".to_string()]
    );

    // A failed swap inside a transaction leaves the previous grants in place
    let txn = db.begin().await?;
    user_permission::replace_for_user(&txn, u.id, &[]).await?;
    txn.rollback().await?;
    assert_eq!(user_permission::list_for_user(&db, u.id).await?.len(), 2);

    user_permission::replace_for_user(&db, u.id, &[]).await?;
    assert!(user_permission::list_for_user(&db, u.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_a_user_cascades_to_credentials_and_permissions() -> Result<()> {
    let db = setup_test_db().await?;
    let u = insert_user(&db, "cascade@example.com").await?;
    user_credentials::upsert_password(&db, u.id, "hash".into(), "argon2").await?;
    user_permission::replace_for_user(&db, u.id, &["Permissions.Users.View".to_string()]).await?;

    user::Entity::delete_by_id(u.id).exec(&db).await?;

    assert!(user_credentials::find_by_user(&db, u.id).await?.is_none());
    assert!(user_permission::list_for_user(&db, u.id).await?.is_empty());
    Ok(())
}
