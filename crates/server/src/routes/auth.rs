use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use common::metrics::record_auth_failure;
use service::auth::domain::LoginInput;
use service::auth::PolicyRegistry;

use crate::errors::JsonApiError;
use crate::extractors::extract_json;
use crate::state::{CurrentUser, ServerState};

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: i32,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: String,
    pub email: String,
    pub permissions: Vec<String>,
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::LoginResponse), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let session = state.auth.login(extract_json(body)?).await?;
    Ok(Json(LoginOutput {
        user_id: session.user.id,
        email: session.user.email,
        token: session.token,
        expires_at: session.expires_at,
    }))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", security(("bearer_auth" = [])), responses((status = 200, description = "Caller identity", body = crate::openapi::MeResponse), (status = 401, description = "Unauthorized")))]
pub async fn me(CurrentUser(claims): CurrentUser) -> Json<MeOutput> {
    Json(MeOutput { user_id: claims.sub, email: claims.email, permissions: claims.permissions })
}

fn is_public(method: &Method, path: &str) -> bool {
    path == "/health"
        || path == "/metrics"
        || path == "/auth/login"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == Method::OPTIONS
}

/// Global middleware: everything except health, metrics, login, the API docs
/// and CORS preflight needs `Authorization: Bearer <jwt>`. Valid claims are
/// stored in the request extensions as [`CurrentUser`].
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        warn!(path = %req.uri().path(), "missing bearer token");
        record_auth_failure("missing_token");
        return Err(JsonApiError::unauthorized("missing bearer token"));
    };

    match state.tokens.validate(bearer.token()) {
        Ok(claims) => {
            debug!(sub = %claims.sub, "token accepted");
            req.extensions_mut().insert(CurrentUser(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %req.uri().path(), error = %e, "token validation failed");
            record_auth_failure("invalid_token");
            Err(e.into())
        }
    }
}

/// State of one permission check: which policy guards the route.
#[derive(Clone)]
pub struct PermissionGuard {
    policies: Arc<PolicyRegistry>,
    policy: String,
}

pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(CurrentUser(claims)) = req.extensions().get::<CurrentUser>() else {
        return Err(JsonApiError::unauthorized("authentication required"));
    };
    if let Err(e) = guard.policies.authorize(claims, &guard.policy) {
        warn!(policy = %guard.policy, sub = %claims.sub, "permission denied");
        record_auth_failure("forbidden");
        return Err(e.into());
    }
    Ok(next.run(req).await)
}

/// Wrap `route` so that it only runs for callers satisfying `policy`.
pub fn guarded(
    policies: &Arc<PolicyRegistry>,
    policy: impl Into<String>,
    route: MethodRouter<ServerState>,
) -> MethodRouter<ServerState> {
    let guard = PermissionGuard { policies: Arc::clone(policies), policy: policy.into() };
    route.route_layer(middleware::from_fn_with_state(guard, require_permission))
}
