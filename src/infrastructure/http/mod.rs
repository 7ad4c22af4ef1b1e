pub mod request_id;

use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health, storage_events::StorageEventsController, webhook::WebhookController,
};
use crate::domain::speech::DispatcherService;
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router
pub fn create_router(
    dispatcher: Arc<DispatcherService>,
    webhook_controller: Arc<WebhookController>,
    storage_events_controller: Arc<StorageEventsController>,
) -> Router {
    // Chat platform updates
    let webhook_routes = Router::new()
        .route("/webhook", post(WebhookController::handle_update))
        .with_state(webhook_controller);

    // Object storage notifications
    let storage_routes = Router::new()
        .route("/storage/events", post(StorageEventsController::handle_event))
        .with_state(storage_events_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(dispatcher)
        .merge(webhook_routes)
        .merge(storage_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    dispatcher: Arc<DispatcherService>,
    webhook_controller: Arc<WebhookController>,
    storage_events_controller: Arc<StorageEventsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(dispatcher, webhook_controller, storage_events_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
