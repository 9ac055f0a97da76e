use crate::errors::ServerError;
use crate::server_handler::GdcServerHandler;
use bon::bon;
use http::StatusCode;
use rmcp::ServiceExt;
use rmcp::transport::sse_server::SseServerConfig;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{SseServer, StreamableHttpService, stdio};
use schemars::JsonSchema;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use url::Url;

/// Fixed body returned for any path other than the MCP endpoints
const NOT_FOUND_BODY: &str =
    "Not found. Valid MCP endpoints are /mcp (streamable HTTP) and /sse (legacy SSE).";

/// A GDC MCP server
pub struct Server {
    transport: Transport,
    endpoint: Url,
}

#[derive(Debug, Clone, Deserialize, Default, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transport {
    /// Use standard IO for server <> client communication
    #[default]
    Stdio,

    /// Host the MCP server over HTTP, serving the streamable HTTP endpoint
    /// and the legacy SSE endpoint from a single listener
    Http {
        /// The IP address to bind to
        #[serde(default = "Transport::default_address")]
        address: IpAddr,

        /// The port to bind to
        #[serde(default = "Transport::default_port")]
        port: u16,
    },
}

impl Transport {
    fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn default_port() -> u16 {
        5000
    }
}

#[bon]
impl Server {
    #[builder]
    pub fn new(transport: Transport, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub async fn start(self) -> Result<(), ServerError> {
        let handler = GdcServerHandler::new(self.endpoint);
        match self.transport {
            Transport::Http { address, port } => serve_http(address, port, handler).await,
            Transport::Stdio => serve_stdio(handler).await,
        }
    }
}

async fn serve_http(
    address: IpAddr,
    port: u16,
    handler: GdcServerHandler,
) -> Result<(), ServerError> {
    info!(port = ?port, address = ?address, "Starting MCP server in HTTP mode");
    let listen_address = SocketAddr::new(address, port);
    let cancellation_token = CancellationToken::new();

    let streamable = StreamableHttpService::new(
        {
            let handler = handler.clone();
            move || Ok(handler.clone())
        },
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let (sse_server, sse_router) = SseServer::new(SseServerConfig {
        bind: listen_address,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: cancellation_token.clone(),
        sse_keep_alive: None,
    });
    let sse_service_token = sse_server.with_service(move || handler.clone());

    let router = axum::Router::new()
        .nest_service("/mcp", streamable)
        .merge(sse_router)
        .fallback(not_found);

    let tcp_listener = tokio::net::TcpListener::bind(listen_address).await?;
    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            cancellation_token.cancel();
            sse_service_token.cancel();
        })
        .await?;
    Ok(())
}

async fn serve_stdio(handler: GdcServerHandler) -> Result<(), ServerError> {
    info!("Starting MCP server in stdio mode");
    let service = handler
        .serve(stdio())
        .await
        .inspect_err(|e| {
            error!("serving error: {:?}", e);
        })
        .map_err(|initialize_error| ServerError::McpInitialize(initialize_error.to_string()))?;
    service.waiting().await.map_err(ServerError::StartupError)?;
    Ok(())
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_defaults_to_stdio() {
        assert!(matches!(Transport::default(), Transport::Stdio));
    }

    #[test]
    fn http_transport_fills_in_default_bind_address() {
        let transport: Transport = serde_json::from_value(json!({ "type": "http" })).unwrap();
        match transport {
            Transport::Http { address, port } => {
                assert_eq!(address, IpAddr::V4(Ipv4Addr::LOCALHOST));
                assert_eq!(port, 5000);
            }
            _ => panic!("expected http transport"),
        }
    }

    #[test]
    fn http_transport_accepts_explicit_bind_address() {
        let transport: Transport = serde_json::from_value(json!({
            "type": "http",
            "address": "0.0.0.0",
            "port": 8000,
        }))
        .unwrap();
        match transport {
            Transport::Http { address, port } => {
                assert_eq!(address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
                assert_eq!(port, 8000);
            }
            _ => panic!("expected http transport"),
        }
    }

    #[tokio::test]
    async fn unknown_paths_get_a_fixed_plaintext_404() {
        let (status, body) = not_found().await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("/mcp"));
        assert!(body.contains("/sse"));
    }
}
