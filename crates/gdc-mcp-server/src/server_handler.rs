use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::errors::McpError;
use crate::graphql;
use crate::tools::graphql_query::{GRAPHQL_QUERY_TOOL_NAME, GraphQLQuery, Input};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorCode, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct GdcServerHandler {
    endpoint: Url,
    query_tool: GraphQLQuery,
    sink: Arc<dyn DiagnosticSink>,
}

impl GdcServerHandler {
    pub fn new(endpoint: Url) -> Self {
        Self::with_sink(endpoint, Arc::new(TracingSink))
    }

    pub fn with_sink(endpoint: Url, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            endpoint,
            query_tool: GraphQLQuery::new(),
            sink,
        }
    }

    /// Dispatch a tool call by name. Split out from the `ServerHandler` impl
    /// so the argument validation paths can be tested without a request
    /// context.
    async fn dispatch(&self, request: CallToolRequestParam) -> Result<CallToolResult, McpError> {
        match request.name.as_ref() {
            GRAPHQL_QUERY_TOOL_NAME => {
                let input: Input = convert_arguments(request)?;
                if input.query.is_empty() {
                    return Err(McpError::new(
                        ErrorCode::INVALID_PARAMS,
                        "query must not be empty".to_string(),
                        None,
                    ));
                }
                let result = graphql::relay(
                    graphql::Request {
                        query: input.query,
                        variables: input.variables,
                        endpoint: &self.endpoint,
                    },
                    self.sink.as_ref(),
                )
                .await;
                tool_result(result)
            }
            _ => Err(tool_not_found(&request.name)),
        }
    }
}

impl ServerHandler for GdcServerHandler {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(request).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: vec![self.query_tool.tool.clone()],
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "GDC MCP Server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Relay GraphQL queries to the NCI Genomic Data Commons API with the \
                 gdc_graphql_query tool. Responses and error envelopes are returned as JSON text."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Serialize the relay result as the tool's text payload. The envelope shape
/// is preserved verbatim; `is_error` is only a hint for the MCP client.
fn tool_result(result: Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&result).map_err(|serialize_error| {
        McpError::new(
            ErrorCode::INTERNAL_ERROR,
            format!("Failed to serialize relay result: {serialize_error}"),
            None,
        )
    })?;
    Ok(CallToolResult {
        content: vec![Content::text(text)],
        is_error: Some(
            result
                .get("errors")
                .filter(|value| !matches!(value, Value::Null))
                .is_some()
                && result
                    .get("data")
                    .filter(|value| !matches!(value, Value::Null))
                    .is_none(),
        ),
    })
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {name} not found"),
        None,
    )
}

fn convert_arguments<T: serde::de::DeserializeOwned>(
    arguments: CallToolRequestParam,
) -> Result<T, McpError> {
    serde_json::from_value(Value::from(arguments.arguments))
        .map_err(|_| McpError::new(ErrorCode::INVALID_PARAMS, "Invalid input".to_string(), None))
}
