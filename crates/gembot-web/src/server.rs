use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::page::page_routes;
use crate::routes::{chat_routes, health_routes};
use crate::services::ChatService;
use crate::{Result, WebError};

/// Web server settings.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

/// Build the router and serve until the process exits.
pub async fn start_server(
    config: &WebConfig,
    service: Arc<ChatService>,
    model: &str,
) -> Result<()> {
    let app = Router::new()
        .merge(page_routes(model))
        .merge(chat_routes(service))
        .merge(health_routes())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| WebError::Config(format!("invalid address: {e}")))?;

    tracing::info!("starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
