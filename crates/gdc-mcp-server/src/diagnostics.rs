//! Diagnostic side channel for the query relay

use tracing::{debug, warn};

/// An event observed while relaying a query upstream. String payloads are
/// already truncated to their preview limits by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A query was sent to the upstream endpoint
    Outbound {
        query: String,
        variables: Option<String>,
    },

    /// The upstream endpoint answered with the given HTTP status
    Response { status: u16 },

    /// A successfully parsed response carried GraphQL-level errors
    UpstreamErrors { summary: String },

    /// The outbound request itself failed before any response arrived
    TransportFailure { detail: String },
}

/// Fire-and-forget sink for relay diagnostics.
///
/// Recording must never fail and must never influence the relay result, so
/// the relay core can be tested without capturing log output.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: RelayEvent);
}

/// Sink that forwards relay events to `tracing`
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: RelayEvent) {
        match event {
            RelayEvent::Outbound { query, variables } => {
                debug!(query = %query, variables = ?variables, "Relaying GraphQL query upstream")
            }
            RelayEvent::Response { status } => debug!(status, "Upstream response received"),
            RelayEvent::UpstreamErrors { summary } => {
                warn!(errors = %summary, "Upstream response contains GraphQL errors")
            }
            RelayEvent::TransportFailure { detail } => {
                warn!(error = %detail, "Failed to send GraphQL request upstream")
            }
        }
    }
}
