mod api;
mod certificate;
mod openapi;
mod pledge;
mod share;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("BACKEND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let state = AppState {
        http: reqwest::Client::new(),
    };

    let openapi = openapi::ApiDoc::openapi();

    let app = Router::new()
        // Swagger UI + OpenAPI schema
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi))
        // API
        .route("/health", get(api::health))
        .route("/pledge/conditions", get(api::pledge_conditions))
        .route("/pledge", post(api::submit_pledge))
        .route("/certificate/lookup", get(api::lookup_certificate))
        .route("/certificate/render", post(api::render))
        .route("/certificate/share", get(api::share_links))
        .with_state(Arc::new(state));

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting dfk-backend on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
