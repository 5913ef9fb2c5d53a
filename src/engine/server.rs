//! The MCP endpoint shared by both servers, built on the `rmcp` SDK.

use crate::cli::{ServeArgs, ServerKind};
use crate::config::{Config, ServerConfig, Transport, is_loopback_host};
use crate::engine::outcome::{ToolResult, render};
use crate::engine::resources::{self, LogBuffer, ResourceKind};
use crate::engine::sheets::SheetServer;
use crate::engine::slides::SlideServer;
use crate::error::{AppError, AppResult};
use axum::Router;
use rmcp::model::{
    CallToolRequestParams, Implementation, JsonObject, ListResourcesResult, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ReadResourceRequestParams, ReadResourceResult,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    model::CallToolResult,
    transport::{StreamableHttpServerConfig, StreamableHttpService, stdio},
};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

/// A document server: a named tool catalog over an in-memory registry.
pub trait DocumentServer: Clone + Send + Sync + 'static {
    /// Name reported in the initialization handshake.
    const NAME: &'static str;
    const TITLE: &'static str;
    /// URI scheme of the server's resources.
    const SCHEME: &'static str;
    const INSTRUCTIONS: &'static str;

    fn tools(&self) -> Vec<Tool>;

    fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> impl Future<Output = ToolResult> + Send;

    /// JSON listing of the documents currently held in memory.
    fn documents(&self) -> impl Future<Output = Value> + Send;
}

/// Adapts a [`DocumentServer`] to the MCP protocol.
#[derive(Clone)]
pub struct Endpoint<S> {
    server: S,
    log_buffer: LogBuffer,
}

impl<S: DocumentServer> Endpoint<S> {
    pub fn new(server: S, log_buffer: LogBuffer) -> Self {
        Self { server, log_buffer }
    }

    /// Run a tool and render its outcome; handler failures never become
    /// protocol errors.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let result = self.server.call(name, arguments).await;
        if let Err(e) = &result {
            warn!(tool = name, error = %e, "Tool call failed");
        }
        render(result)
    }
}

// ───── ServerHandler impl ─────

#[allow(clippy::manual_async_fn)]
impl<S: DocumentServer> ServerHandler for Endpoint<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: S::NAME.to_string(),
                title: Some(S::TITLE.to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(env!("CARGO_PKG_DESCRIPTION").to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(S::INSTRUCTIONS.to_string()),
        }
    }

    fn call_tool(
        &self,
        call: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, McpError>> + Send + '_
    {
        async move {
            info!("call_tool: {}", call.name);
            Ok(self.dispatch(call.name.as_ref(), call.arguments).await)
        }
    }

    fn list_tools(
        &self,
        _pagination: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_
    {
        async move {
            info!("list_tools requested");
            Ok(ListToolsResult {
                meta: None,
                tools: self.server.tools(),
                next_cursor: None,
            })
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListResourcesResult, McpError>> + Send + '_
    {
        async move {
            info!("list_resources requested");
            Ok(resources::list_resources_impl(S::SCHEME, S::TITLE))
        }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ReadResourceResult, McpError>> + Send + '_
    {
        async move {
            info!("read_resource: {}", request.uri);
            match ResourceKind::from_uri(S::SCHEME, &request.uri) {
                Some(ResourceKind::Logs) => Ok(resources::read_logs(&request.uri, &self.log_buffer)),
                Some(ResourceKind::Documents) => {
                    let documents = self.server.documents().await;
                    Ok(resources::read_documents(&request.uri, &documents))
                }
                None => Err(McpError::invalid_params(
                    format!("Unknown resource URI: {}", request.uri),
                    None,
                )),
            }
        }
    }
}

/// The tool catalog of one server, as pretty-printed JSON.
pub fn catalog_json(kind: ServerKind) -> AppResult<String> {
    let config = Config::default();
    let tools = match kind {
        ServerKind::Sheets => SheetServer::new(config.sheets).tools(),
        ServerKind::Slides => SlideServer::new(config.slides).tools(),
    };
    Ok(serde_json::to_string_pretty(&tools)?)
}

/// Configures and starts one of the MCP servers.
pub async fn start_server(kind: ServerKind, overrides: ServeArgs) -> AppResult<()> {
    use resources::{LogCaptureLayer, new_log_buffer};
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // Load configuration
    let mut config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(transport) = overrides.transport {
        config.server.transport = transport;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }

    // Set up tracing with log capture layer; stdout carries the protocol.
    let log_buffer = new_log_buffer(resources::LOG_BUFFER_CAPACITY);
    let log_layer = LogCaptureLayer::new(log_buffer.clone(), resources::LOG_BUFFER_CAPACITY);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let level = if config.server.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(log_layer)
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    match kind {
        ServerKind::Sheets => {
            info!(dir = %config.sheets.default_dir.display(), "Default workbook directory");
            let endpoint = Endpoint::new(SheetServer::new(config.sheets), log_buffer);
            serve(endpoint, &config.server).await
        }
        ServerKind::Slides => {
            let endpoint = Endpoint::new(SlideServer::new(config.slides), log_buffer);
            serve(endpoint, &config.server).await
        }
    }
}

async fn serve<S: DocumentServer>(endpoint: Endpoint<S>, server: &ServerConfig) -> AppResult<()> {
    match server.transport {
        Transport::Stdio => {
            info!("Starting {} server with stdio transport...", S::NAME);
            let service = endpoint
                .serve(stdio())
                .await
                .map_err(|e| AppError::ServerInit(Box::new(e)))?;
            // Keep the stdio service alive for the full client session.
            let quit_reason = service.waiting().await?;
            info!(?quit_reason, "{} stdio session finished", S::NAME);
        }
        Transport::Http => {
            let host = server.host.clone();
            let port = server.port;

            if !server.allow_remote && !is_loopback_host(&host) {
                return Err(anyhow::anyhow!(
                    "Refusing to bind HTTP server to non-loopback host '{}'. \
Set OFFICE_MCP__SERVER__ALLOW_REMOTE=true only behind an authenticated TLS reverse proxy.",
                    host
                )
                .into());
            }

            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;
            info!(
                "Starting {} server over HTTP (Streamable HTTP) at http://{}/mcp",
                S::NAME,
                addr
            );
            let http_config = StreamableHttpServerConfig::default();
            let cancellation = http_config.cancellation_token.clone();
            let service = StreamableHttpService::new(
                move || Ok(endpoint.clone()),
                LocalSessionManager::default().into(),
                http_config,
            );
            let router = Router::new()
                .nest_service("/mcp", service)
                .layer(RequestBodyLimitLayer::new(
                    server.max_request_body_bytes.max(1024),
                ))
                .layer(ConcurrencyLimitLayer::new(
                    server.max_concurrent_requests.max(1),
                ));

            let tcp_listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(tcp_listener, router)
                .with_graceful_shutdown(async move {
                    let _ = tokio::signal::ctrl_c().await;
                    cancellation.cancel();
                })
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SheetsConfig, SlidesConfig};
    use rmcp::ServerHandler;
    use serde_json::json;

    fn sheets_endpoint(dir: &std::path::Path) -> Endpoint<SheetServer> {
        let config = SheetsConfig {
            default_dir: dir.to_path_buf(),
            ..SheetsConfig::default()
        };
        Endpoint::new(SheetServer::new(config), resources::new_log_buffer(10))
    }

    /// Helper to extract the text of a CallToolResult's first content item.
    fn extract_text(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .expect("expected text content")
            .text
            .as_str()
    }

    // ───── get_info tests ─────

    #[test]
    fn get_info_returns_sheets_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let info = sheets_endpoint(dir.path()).get_info();

        assert_eq!(info.server_info.name, "AI-Sheets");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.instructions.is_some());
        assert!(
            info.capabilities.tools.is_some(),
            "tools capability should be enabled"
        );
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn get_info_returns_slides_metadata() {
        let endpoint = Endpoint::new(
            SlideServer::new(SlidesConfig::default()),
            resources::new_log_buffer(10),
        );
        let info = endpoint.get_info();
        assert_eq!(info.server_info.name, "PowerPoint-Creator");
        assert_eq!(info.server_info.title.as_deref(), Some("PowerPoint Creator"));
    }

    // ───── dispatch tests ─────

    #[tokio::test]
    async fn dispatch_renders_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = sheets_endpoint(dir.path());

        let ok = endpoint
            .dispatch(
                "test_simple",
                json!({ "message": "hello" }).as_object().cloned(),
            )
            .await;
        assert_ne!(ok.is_error, Some(true));
        assert!(extract_text(&ok).starts_with("✅ Test succeeded! Message received: hello"));

        let missing = endpoint
            .dispatch(
                "add_sheet",
                json!({ "filename": "nope", "sheet_name": "S", "data": [] })
                    .as_object()
                    .cloned(),
            )
            .await;
        assert_eq!(missing.is_error, Some(true));
        assert_eq!(
            extract_text(&missing),
            "❌ Error: Workbook 'nope' not found. Create it first."
        );
    }

    #[tokio::test]
    async fn unknown_tools_are_reported_as_content() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = sheets_endpoint(dir.path());
        let result = endpoint.dispatch("frobnicate", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(extract_text(&result), "❌ Unknown tool: frobnicate");
        assert_eq!(endpoint.server.documents().await, json!([]));
    }

    #[test]
    fn catalog_json_lists_tool_names() {
        let sheets: Value = serde_json::from_str(&catalog_json(ServerKind::Sheets).unwrap()).unwrap();
        let names: Vec<&str> = sheets
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(
            names,
            [
                "create_workbook",
                "add_sheet",
                "save_workbook",
                "write_excel",
                "read_excel",
                "test_simple"
            ]
        );

        let slides: Value = serde_json::from_str(&catalog_json(ServerKind::Slides).unwrap()).unwrap();
        assert_eq!(slides.as_array().unwrap().len(), 5);
    }
}
