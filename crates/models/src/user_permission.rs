use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub permission: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Permission names granted to `user_id`, alphabetical.
pub async fn list_for_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<String>, ModelError> {
    let rows = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::Permission)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(rows.into_iter().map(|r| r.permission).collect())
}

/// Replace the whole grant set of `user_id`. Run it inside a transaction
/// when the caller needs the swap to be atomic.
pub async fn replace_for_user<C: ConnectionTrait>(db: &C, user_id: i32, permissions: &[String]) -> Result<(), ModelError> {
    Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if permissions.is_empty() {
        return Ok(());
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = permissions.iter().map(|p| ActiveModel {
        user_id: Set(user_id),
        permission: Set(p.clone()),
        created_at: Set(now),
        ..Default::default()
    });
    Entity::insert_many(rows)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}
