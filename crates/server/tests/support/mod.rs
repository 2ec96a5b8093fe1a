#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::Value;
use tower::Service;

use configs::AdminConfig;
use server::startup::{build_app, seed_admin};
use server::ServerState;
use service::auth::domain::AuthUser;
use service::auth::{TokenService, TokenSettings};

pub const ADMIN_EMAIL: &str = "admin@pms.example";
pub const ADMIN_PASSWORD: &str = "Adm1n-Passw0rd";

pub fn token_settings() -> TokenSettings {
    TokenSettings {
        issuer: "pms-tests".into(),
        audience: "pms-tests".into(),
        key: "0123456789abcdef0123456789abcdef".into(),
        lifetime: chrono::Duration::minutes(30),
    }
}

/// Migrated in-memory database behind a fully wired state.
pub async fn test_state() -> anyhow::Result<ServerState> {
    let db = models::db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(ServerState::new(db, TokenService::new(token_settings())))
}

pub async fn app_with_admin() -> anyhow::Result<(Router, ServerState)> {
    let state = test_state().await?;
    let admin = AdminConfig {
        email: ADMIN_EMAIL.into(),
        password: ADMIN_PASSWORD.into(),
        first_name: "System".into(),
        last_name: "Administrator".into(),
        phone_number: "+10000000000".into(),
    };
    seed_admin(&state, &admin).await?;
    Ok((build_app(state.clone()), state))
}

/// Token for a caller holding exactly `permissions`.
pub fn token_with(state: &ServerState, permissions: &[&str]) -> String {
    let user = AuthUser { id: 999, email: "caller@pms.example".into(), name: "Caller".into() };
    let perms: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
    state.tokens.issue(&user, &perms).unwrap().token
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, value))
}

pub async fn login(app: &Router, email: &str, password: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, "POST", "/auth/login", None, Some(serde_json::json!({"email": email, "password": password}))).await
}
