//! Products API - REST server over the in-memory product catalog

use axum::{http::HeaderValue, Router};
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        id_start = config.store.id_start,
        id_max = config.store.id_max,
        "Initializing in-memory product store"
    );
    let state = AppState::new(config);
    let app = build_app(&state)?;

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    create_production_app(
        app,
        &state.config.server,
        state.config.server.shutdown_timeout,
        async {
            info!("No external resources to release");
        },
    )
    .await
    .wrap_err("Server error")?;

    info!("Products API shutdown complete");
    Ok(())
}

/// Assemble API routes, documentation, health endpoint and middleware.
fn build_app(state: &AppState) -> eyre::Result<Router> {
    let cors_origins = state
        .config
        .server
        .cors_allowed_origins
        .as_ref()
        .map(|origins| {
            origins
                .iter()
                .map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .wrap_err_with(|| format!("Invalid CORS_ALLOWED_ORIGIN value: {}", origin))
                })
                .collect::<eyre::Result<Vec<_>>>()
        })
        .transpose()?;

    let router = create_router::<openapi::ApiDoc>(api::routes(state), cors_origins);
    Ok(router.merge(health_router(state.config.app)))
}
