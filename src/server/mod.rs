//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::migration;
use crate::repository::identity_provider::IdentityProviderRepositoryImpl;
use crate::service::IdentityProviderService;
use crate::state::HasIdentityProviders;
use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub identity_provider_service:
        Arc<IdentityProviderService<IdentityProviderRepositoryImpl>>,
}

impl HasIdentityProviders for AppState {
    type IdpRepo = IdentityProviderRepositoryImpl;

    fn identity_provider_service(&self) -> &IdentityProviderService<Self::IdpRepo> {
        &self.identity_provider_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    // Create database connection pool
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    migration::run(&db_pool).await?;

    // Create repository and service
    let idp_repo = Arc::new(IdentityProviderRepositoryImpl::new(db_pool.clone()));
    let identity_provider_service = Arc::new(IdentityProviderService::new(idp_repo));

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        identity_provider_service,
    };

    let app = build_router(state, prometheus_handle);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router with generic state type
///
/// This function is generic over the state type, allowing it to work with
/// both the production `AppState` and test implementations.
pub fn build_router<S: HasIdentityProviders>(
    state: S,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    // CORS is configured per route group: the collection route accepts
    // GET/POST, the item route GET/PUT/DELETE.
    let collection_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let item_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let collection = Router::new()
        .route(
            "/identity-providers",
            get(api::identity_provider::list::<S>)
                .post(api::identity_provider::create::<S>)
                .options(api::identity_provider::preflight),
        )
        .layer(collection_cors);

    let item = Router::new()
        .route(
            "/identity-providers/{id}",
            get(api::identity_provider::get::<S>)
                .put(api::identity_provider::update::<S>)
                .delete(api::identity_provider::delete::<S>)
                .options(api::identity_provider::preflight),
        )
        .layer(item_cors);

    let metrics_router = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(prometheus_handle));

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Identity provider endpoints
        .merge(collection)
        .merge(item)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(metrics_router)
}
