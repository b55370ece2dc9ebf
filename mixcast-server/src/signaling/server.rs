use crate::config::RelayConfig;
use crate::hub::HubHandle;
use crate::signaling::ws_handler;
use crate::transport::{AcceptAllOrigins, OriginPolicy};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state of the websocket endpoint.
#[derive(Clone)]
pub struct RelayState {
    pub hub: HubHandle,
    pub origins: Arc<dyn OriginPolicy>,
    pub max_message_size: usize,
}

impl RelayState {
    pub fn new(hub: HubHandle, config: &RelayConfig) -> Self {
        Self {
            hub,
            origins: Arc::new(AcceptAllOrigins),
            max_message_size: config.max_message_size,
        }
    }

    pub fn with_origin_policy(mut self, policy: impl OriginPolicy) -> Self {
        self.origins = Arc::new(policy);
        self
    }
}

pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `config.bind` and relays until the listener fails.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let hub = HubHandle::spawn(&config);
    let app = relay_router(RelayState::new(hub, &config));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Signaling relay listening on ws://{}", config.bind);

    axum::serve(listener, app)
        .await
        .context("Relay server stopped")
}
