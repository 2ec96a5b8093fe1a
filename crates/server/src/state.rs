use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sea_orm::DatabaseConnection;

use service::auth::{AuthClaims, AuthService, PolicyRegistry, SeaOrmAccountRepository, TokenService};
use service::Mediator;

use crate::errors::JsonApiError;

/// Everything a handler can reach. Built once at startup, cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub mediator: Mediator,
    pub auth: Arc<AuthService<SeaOrmAccountRepository>>,
    pub tokens: Arc<TokenService>,
    pub policies: Arc<PolicyRegistry>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, tokens: TokenService) -> Self {
        let tokens = Arc::new(tokens);
        let accounts = Arc::new(SeaOrmAccountRepository::new(db.clone()));
        Self {
            mediator: Mediator::new(db.clone()),
            auth: Arc::new(AuthService::new(accounts, tokens.clone())),
            policies: Arc::new(PolicyRegistry::with_permission_policies()),
            tokens,
            db,
        }
    }
}

/// Validated token claims of the caller, set by the bearer middleware.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthClaims);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| JsonApiError::unauthorized("authentication required"))
    }
}
