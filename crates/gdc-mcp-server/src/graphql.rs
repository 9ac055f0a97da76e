//! Relay GraphQL queries to the upstream GDC endpoint
//!
//! The relay performs exactly one HTTP POST per invocation and never returns
//! an error: every failure path is converted into a GraphQL-style error
//! envelope so the tool layer always has a well-formed value to serialize.

use crate::diagnostics::{DiagnosticSink, RelayEvent};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::{Map, Value, json};
use url::Url;

/// Identifying agent string sent with every upstream request
pub const CLIENT_AGENT: &str = concat!("gdc-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Upstream body characters echoed back in the envelope on an HTTP error
const HTTP_ERROR_BODY_LIMIT: usize = 500;

/// Upstream body characters echoed back in the envelope on a non-JSON response
const NON_JSON_BODY_LIMIT: usize = 1000;

/// Query characters included in diagnostic events
const QUERY_PREVIEW_LIMIT: usize = 150;

/// Variable JSON characters included in diagnostic events
const VARIABLES_PREVIEW_LIMIT: usize = 100;

/// A GraphQL query to relay to the upstream endpoint
pub struct Request<'a> {
    pub query: String,
    pub variables: Option<Map<String, Value>>,
    pub endpoint: &'a Url,
}

/// Relay a query to the upstream endpoint and normalize the result.
///
/// Returns either the upstream JSON response verbatim, or an error envelope
/// of the form `{"errors": [{"message": ..., "extensions"?: {...}}]}`.
pub async fn relay(request: Request<'_>, sink: &dyn DiagnosticSink) -> Value {
    let body = request_body(&request.query, request.variables.as_ref());
    sink.record(RelayEvent::Outbound {
        query: truncate_chars(&request.query, QUERY_PREVIEW_LIMIT),
        variables: request
            .variables
            .as_ref()
            .filter(|variables| !variables.is_empty())
            .and_then(|variables| serde_json::to_string(variables).ok())
            .map(|encoded| truncate_chars(&encoded, VARIABLES_PREVIEW_LIMIT)),
    });

    let response = match reqwest::Client::new()
        .post(request.endpoint.clone())
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .header(USER_AGENT, CLIENT_AGENT)
        .json(&body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(send_error) => {
            sink.record(RelayEvent::TransportFailure {
                detail: send_error.to_string(),
            });
            return error_envelope(format!("Client-side error: {send_error}"), None);
        }
    };

    let status = response.status();
    sink.record(RelayEvent::Response {
        status: status.as_u16(),
    });

    // Best-effort body read; classification proceeds with an empty body
    let body_text = response.text().await.unwrap_or_default();

    if !status.is_success() {
        let message = format!("Upstream HTTP Error {}", status.as_u16());
        let response_text = format!(
            "{message}: {}",
            truncate_chars(&body_text, HTTP_ERROR_BODY_LIMIT)
        );
        return error_envelope(
            message,
            Some(json!({
                "statusCode": status.as_u16(),
                "responseText": response_text,
            })),
        );
    }

    match serde_json::from_str::<Value>(&body_text) {
        Ok(parsed) => {
            if let Some(errors) = parsed.get("errors").filter(|errors| !errors.is_null()) {
                sink.record(RelayEvent::UpstreamErrors {
                    summary: error_summary(errors),
                });
            }
            parsed
        }
        Err(_) => error_envelope(
            "Upstream Error: Non-JSON response.".to_string(),
            Some(json!({
                "statusCode": status.as_u16(),
                "responseText": truncate_chars(&body_text, NON_JSON_BODY_LIMIT),
            })),
        ),
    }
}

/// Build the outbound request body. Empty variable maps collapse to omission
/// so the upstream service never sees a `variables` key without content.
fn request_body(query: &str, variables: Option<&Map<String, Value>>) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), Value::String(query.to_string()));
    if let Some(variables) = variables.filter(|variables| !variables.is_empty()) {
        body.insert("variables".to_string(), Value::Object(variables.clone()));
    }
    Value::Object(body)
}

fn error_envelope(message: String, extensions: Option<Value>) -> Value {
    let mut error = Map::new();
    error.insert("message".to_string(), Value::String(message));
    if let Some(extensions) = extensions {
        error.insert("extensions".to_string(), extensions);
    }
    json!({ "errors": [Value::Object(error)] })
}

/// Summarize GraphQL-level errors for diagnostics, falling back to the raw
/// JSON when the list carries no message strings
fn error_summary(errors: &Value) -> String {
    errors
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|error| error.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| errors.to_string())
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
