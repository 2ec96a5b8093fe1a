pub mod auth;
pub mod reference;
pub mod users;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::metrics::{encode_metrics, record_request};
use common::types::Health;
use service::auth::permissions::{permission, Action, MANAGE_PERMISSIONS, USERS};
use service::domain::{Court, Management, Prison};

use crate::openapi::ApiDoc;
use crate::state::ServerState;
use auth::guarded;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn metrics() -> (axum::http::StatusCode, String) {
    encode_metrics()
}

async fn record_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let resp = next.run(req).await;
    record_request(&method, resp.status().as_u16());
    resp
}

/// Build the full application router: public endpoints, the bearer-protected
/// API with per-route permission guards, and the OpenAPI docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let policies = state.policies.clone();
    let users_perm = |action| permission(USERS, action);

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/auth/login", post(auth::login));

    let user_routes = Router::new()
        .route(
            "/users",
            guarded(&policies, users_perm(Action::View), get(users::list_users))
                .merge(guarded(&policies, users_perm(Action::Create), post(users::create_user))),
        )
        .route(
            "/users/:id",
            guarded(&policies, users_perm(Action::View), get(users::get_user))
                .merge(guarded(&policies, users_perm(Action::Edit), put(users::update_user)))
                .merge(guarded(&policies, users_perm(Action::Delete), delete(users::delete_user))),
        )
        .route("/users/:id/password", put(users::set_password))
        .route(
            "/users/:id/permissions",
            guarded(&policies, MANAGE_PERMISSIONS, put(users::replace_permissions)),
        );

    let api = Router::new()
        .route("/auth/me", get(auth::me))
        .merge(user_routes)
        .merge(reference::routes::<Prison>(&policies))
        .merge(reference::routes::<Management>(&policies))
        .merge(reference::routes::<Court>(&policies));

    public
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .with_state(state)
        .layer(middleware::from_fn(record_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
