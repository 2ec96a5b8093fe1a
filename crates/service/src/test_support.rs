#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_sqlite_memory;
use sea_orm::DatabaseConnection;

/// Fresh migrated in-memory database; each call is isolated from the others.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
