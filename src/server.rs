//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Activities API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::services::ActivityService;
use crate::telemetry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub activities: ActivityService,
}

impl AppState {
    /// Builds the state, wiring the activity service to the given pool
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        Self {
            config: Arc::new(config),
            activities: ActivityService::new(db.clone()),
            db,
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/activities", get(handlers::activities::list_activities))
        .route(
            "/activities/{activity_name}/signup",
            post(handlers::activities::signup_for_activity),
        )
        .route(
            "/activities/{activity_name}/unregister",
            delete(handlers::activities::unregister_from_activity),
        )
        .nest_service("/static", static_files)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server with the given configuration and serves until Ctrl-C
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let app = create_app(AppState::new(config, db));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::activities::list_activities,
        crate::handlers::activities::signup_for_activity,
        crate::handlers::activities::unregister_from_activity,
    ),
    components(
        schemas(
            crate::models::ActivityDetails,
            crate::handlers::HealthResponse,
            crate::handlers::activities::ActivitiesResponse,
            crate::handlers::activities::MessageResponse,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "root", description = "Service entry points"),
        (name = "activities", description = "Extracurricular activities and enrollments")
    ),
    info(
        title = "Mergington High School Activities API",
        description = "View and sign up for extracurricular activities",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
