//! Port definitions.
//!
//! Ports define the collaborators the dispatcher depends on: the HTTP
//! transport and the request log sink. Adapters implement them
//! (`ReqwestTransport`, `FileRequestLog`, stubs for tests).

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::TransportError;

/// Method-specific parameters, and the full envelope once public fields are merged in.
pub type Params = Map<String, Value>;

/// Decoded response object.
pub type Reply = Map<String, Value>;

/// A single log record.
pub type LogRecord = Map<String, Value>;

// =============================================================================
// Transport Port
// =============================================================================

/// HTTP verb for a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpVerb {
    Post,
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpVerb::Post => write!(f, "POST"),
        }
    }
}

/// One HTTP attempt, fully described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP verb
    pub verb: HttpVerb,
    /// Target URL (gateway + entrance)
    pub url: String,
    /// Remote service name
    pub service_name: String,
    /// Form-encoded body fields, in order
    pub form_params: Vec<(String, String)>,
    /// Overall timeout (zero: no limit)
    pub timeout: Duration,
    /// Read timeout (zero: no limit)
    pub read_timeout: Duration,
    /// Connect timeout (zero: no limit); `ReqwestTransport` builds a
    /// dedicated client when this differs from its shared client's value
    pub connect_timeout: Duration,
}

impl TransportRequest {
    /// Look up a form field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Port for performing HTTP requests.
///
/// Implementations:
/// - `ReqwestTransport` - Real HTTP via reqwest
/// - `ScriptedTransport` - For testing (replays queued responses)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request and return the raw response body.
    ///
    /// Must return `Err` only for transport-level failures (DNS, connect,
    /// timeout). Application-level responses, whatever their HTTP status,
    /// are returned as bodies.
    async fn perform_request(&self, request: TransportRequest) -> Result<String, TransportError>;
}

// =============================================================================
// Request Log Port
// =============================================================================

/// Port for the request/response record sink.
///
/// Implementations must never fail; a disabled sink is a no-op.
pub trait RequestLog: Send + Sync {
    /// Record one event.
    fn write(&self, record: LogRecord);
}
