use std::net::SocketAddr;

use axum::Router;
use configs::{AdminConfig, AppConfig, DatabaseConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::{permissions, TokenService, TokenSettings};
use service::repo::SeaOrmRepository;
use service::repository::UserRepository;
use service::users::CreateUserCommand;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the pool and bring the schema up to date when configured to.
pub async fn connect_database(cfg: &DatabaseConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(cfg).await?;
    if cfg.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }
    Ok(db)
}

/// Wire every service over `db`. Nothing here touches the network.
pub fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> Result<ServerState, StartupError> {
    let settings = TokenSettings::try_from(&cfg.jwt).map_err(bootstrap)?;
    Ok(ServerState::new(db, TokenService::new(settings)))
}

fn bootstrap(e: impl std::fmt::Display) -> StartupError {
    StartupError::Bootstrap(e.to_string())
}

/// Create the configured administrator with every catalog permission,
/// unless a user with that email already exists.
pub async fn seed_admin(state: &ServerState, admin: &AdminConfig) -> Result<(), StartupError> {
    let users = SeaOrmRepository::<_, service::domain::User>::new(&state.db);
    if users.find_by_email(&admin.email).await.map_err(bootstrap)?.is_some() {
        info!(email = %admin.email, "bootstrap admin already present");
        return Ok(());
    }

    let id = state
        .mediator
        .send(CreateUserCommand {
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            email: admin.email.clone(),
            phone_number: admin.phone_number.clone(),
        })
        .await
        .map_err(bootstrap)?;
    state.auth.set_password(id, &admin.password).await.map_err(bootstrap)?;
    state
        .auth
        .replace_permissions(id, permissions::all())
        .await
        .map_err(bootstrap)?;
    info!(user_id = id, email = %admin.email, "bootstrap admin created");
    Ok(())
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app from validated config and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = connect_database(&cfg.database).await?;
    let state = build_state(&cfg, db)?;

    if let Some(admin) = &cfg.admin {
        seed_admin(&state, admin).await?;
    }
    if let Some(smtp) = &cfg.smtp {
        info!(host = %smtp.host, port = smtp.port, "smtp settings loaded; outbound mail is not sent by this service");
    }

    let app = build_app(state);
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
