//! Generic CRUD handlers shared by prisons, managements and courts.

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::{de::DeserializeOwned, Serialize};

use service::auth::permissions::{permission, Action};
use service::auth::PolicyRegistry;
use service::pagination::Pagination;
use service::reference::{self, Reference};
use service::repo::SeaOrmRepository;
use service::repository::Repository;

use super::auth::guarded;
use crate::errors::JsonApiError;
use crate::extractors::{extract_json, extract_path, extract_query};
use crate::state::ServerState;

pub async fn list<T>(
    State(state): State<ServerState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<T>>, JsonApiError>
where
    T: Reference + Serialize,
    for<'c> SeaOrmRepository<'c, DatabaseConnection, T>: Repository<T>,
{
    let page = extract_query(query)?;
    let repo = SeaOrmRepository::<_, T>::new(&state.db);
    Ok(Json(reference::list(&repo, page).await?))
}

pub async fn create<T>(
    State(state): State<ServerState>,
    body: Result<Json<T>, JsonRejection>,
) -> Result<(StatusCode, Json<T>), JsonApiError>
where
    T: Reference + Serialize,
    for<'c> SeaOrmRepository<'c, DatabaseConnection, T>: Repository<T>,
{
    let item = extract_json(body)?;
    let repo = SeaOrmRepository::<_, T>::new(&state.db);
    Ok((StatusCode::CREATED, Json(reference::create(&repo, item).await?)))
}

pub async fn get_one<T>(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<T>, JsonApiError>
where
    T: Reference + Serialize,
    for<'c> SeaOrmRepository<'c, DatabaseConnection, T>: Repository<T>,
{
    let id = extract_path(path)?;
    let repo = SeaOrmRepository::<_, T>::new(&state.db);
    Ok(Json(reference::get(&repo, id).await?))
}

pub async fn update<T>(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<T>, JsonRejection>,
) -> Result<Json<T>, JsonApiError>
where
    T: Reference + Serialize,
    for<'c> SeaOrmRepository<'c, DatabaseConnection, T>: Repository<T>,
{
    let id = extract_path(path)?;
    let item = extract_json(body)?;
    let repo = SeaOrmRepository::<_, T>::new(&state.db);
    Ok(Json(reference::update(&repo, id, item).await?))
}

pub async fn remove<T>(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError>
where
    T: Reference,
    for<'c> SeaOrmRepository<'c, DatabaseConnection, T>: Repository<T>,
{
    let id = extract_path(path)?;
    let repo = SeaOrmRepository::<_, T>::new(&state.db);
    reference::delete::<T, _>(&repo, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `/{module}` and `/{module}/:id`, each method behind its own permission.
pub fn routes<T>(policies: &Arc<PolicyRegistry>) -> Router<ServerState>
where
    T: Reference + Serialize + DeserializeOwned,
    for<'c> SeaOrmRepository<'c, DatabaseConnection, T>: Repository<T>,
{
    let perm = |action| permission(T::MODULE, action);
    let collection = format!("/{}", T::MODULE.to_lowercase());
    let item = format!("{collection}/:id");

    Router::new()
        .route(
            &collection,
            guarded(policies, perm(Action::View), get(list::<T>))
                .merge(guarded(policies, perm(Action::Create), post(create::<T>))),
        )
        .route(
            &item,
            guarded(policies, perm(Action::View), get(get_one::<T>))
                .merge(guarded(policies, perm(Action::Edit), put(update::<T>)))
                .merge(guarded(policies, perm(Action::Delete), delete(remove::<T>))),
        )
}
