use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use service::auth::permissions::MANAGE_PERMISSIONS;
use service::domain::User;
use service::pagination::Pagination;
use service::users::{CreateUserCommand, DeleteUserCommand, GetUserQuery, ListUsersQuery, UpdateUserCommand};

use crate::errors::JsonApiError;
use crate::extractors::{extract_json, extract_path, extract_query};
use crate::state::{CurrentUser, ServerState};

#[derive(Serialize)]
pub struct CreatedOutput {
    pub id: i32,
}

#[derive(Deserialize)]
pub struct PasswordInput {
    pub password: String,
}

#[derive(Deserialize)]
pub struct PermissionsInput {
    pub permissions: Vec<String>,
}

#[utoipa::path(get, path = "/users", tag = "users", security(("bearer_auth" = [])), params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Page size, at most 100")), responses((status = 200, description = "Users", body = [crate::openapi::UserDoc]), (status = 403, description = "Forbidden")))]
pub async fn list_users(
    State(state): State<ServerState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<User>>, JsonApiError> {
    let pagination = extract_query(query)?;
    Ok(Json(state.mediator.send(ListUsersQuery { pagination }).await?))
}

#[utoipa::path(post, path = "/users", tag = "users", security(("bearer_auth" = [])), request_body = crate::openapi::UserInput, responses((status = 201, description = "Created", body = crate::openapi::CreatedResponse), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn create_user(
    State(state): State<ServerState>,
    body: Result<Json<CreateUserCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedOutput>), JsonApiError> {
    let id = state.mediator.send(extract_json(body)?).await?;
    Ok((StatusCode::CREATED, Json(CreatedOutput { id })))
}

#[utoipa::path(get, path = "/users/{id}", tag = "users", security(("bearer_auth" = [])), params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "User", body = crate::openapi::UserDoc), (status = 404, description = "Not Found")))]
pub async fn get_user(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = extract_path(path)?;
    Ok(Json(state.mediator.send(GetUserQuery { id }).await?))
}

#[utoipa::path(put, path = "/users/{id}", tag = "users", security(("bearer_auth" = [])), params(("id" = i32, Path, description = "User id")), request_body = crate::openapi::UserInput, responses((status = 200, description = "Updated", body = crate::openapi::UserDoc), (status = 404, description = "Not Found"), (status = 409, description = "Conflict")))]
pub async fn update_user(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<CreateUserCommand>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = extract_path(path)?;
    let fields = extract_json(body)?;
    Ok(Json(state.mediator.send(UpdateUserCommand::new(id, fields)).await?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users", security(("bearer_auth" = [])), params(("id" = i32, Path, description = "User id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = extract_path(path)?;
    state.mediator.send(DeleteUserCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Callers may change their own password; anyone else's requires `ManagePermissions`.
#[utoipa::path(put, path = "/users/{id}/password", tag = "users", security(("bearer_auth" = [])), params(("id" = i32, Path, description = "User id")), request_body = crate::openapi::PasswordRequest, responses((status = 204, description = "Password set"), (status = 400, description = "Bad Request"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn set_password(
    State(state): State<ServerState>,
    CurrentUser(claims): CurrentUser,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<PasswordInput>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = extract_path(path)?;
    if claims.user_id() != Some(id) {
        state.policies.authorize(&claims, MANAGE_PERMISSIONS)?;
    }
    let input = extract_json(body)?;
    state.auth.set_password(id, &input.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/users/{id}/permissions", tag = "users", security(("bearer_auth" = [])), params(("id" = i32, Path, description = "User id")), request_body = crate::openapi::PermissionsRequest, responses((status = 204, description = "Permissions replaced"), (status = 400, description = "Unknown permission"), (status = 404, description = "Not Found")))]
pub async fn replace_permissions(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<PermissionsInput>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = extract_path(path)?;
    let input = extract_json(body)?;
    state.auth.replace_permissions(id, input.permissions).await?;
    Ok(StatusCode::NO_CONTENT)
}
