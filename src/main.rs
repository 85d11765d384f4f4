mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;
mod logger;

use std::net::SocketAddr;
use std::path::Path;
use axum::{Router, routing::get, response::Html};
use crate::routes::analysis_routes::api_routes;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::shared_state::AppState;
use crate::config::Config;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    // 1. Load configuration (defaults when there is no file)
    let (config, config_note) = if Path::new(CONFIG_PATH).exists() {
        match Config::load(CONFIG_PATH) {
            Ok(c) => (c, "loaded config.json"),
            Err(e) => {
                eprintln!("Failed to load {CONFIG_PATH}: {e}");
                return;
            }
        }
    } else {
        (Config::default(), "no config.json, using defaults")
    };

    // 2. Logging
    logger::init_logger(config.log_format);
    tracing::info!(
        offline_mode = config.offline_mode,
        irradiance_url = %config.irradiance.base_url,
        "{config_note}"
    );

    // 3. Build services once; every request borrows them through State
    let server_port = config.server.port;
    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to build irradiance client");
            return;
        }
    };

    // 4. Start Axum HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!("API Server listening on http://{}", addr);
    tracing::info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!(error = %e, "server stopped");
    }
}
