//! Stub implementations for testing.
//!
//! These implementations replay scripted transport responses and capture
//! log records without touching the network or the filesystem.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::TransportError;
use crate::ports::{LogRecord, RequestLog, Transport, TransportRequest};

// =============================================================================
// Scripted Transport
// =============================================================================

/// Stub transport for testing.
///
/// Replays queued responses in order and records every request it receives.
/// Once the script runs dry each call fails with `RequestFailed`.
#[derive(Default)]
pub struct ScriptedTransport {
    /// Queued outcomes, front first
    script: Mutex<VecDeque<Result<String, TransportError>>>,
    /// Requests received so far
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    /// Create an empty scripted transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body.
    pub fn push_body(&self, body: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(body.into()));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of transport calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform_request(&self, request: TransportRequest) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request);

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::RequestFailed("no scripted response".to_string())))
    }
}

// =============================================================================
// Memory Request Log
// =============================================================================

/// Stub request log that keeps records in memory.
#[derive(Default)]
pub struct MemoryRequestLog {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryRequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestLog for MemoryRequestLog {
    fn write(&self, record: LogRecord) {
        self.records.lock().unwrap().push(record);
    }
}
