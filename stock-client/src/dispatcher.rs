//! Request dispatcher.
//!
//! Executes one logical remote call: builds the envelope, posts it through
//! the transport, decodes the reply, and retries with a fresh idempotency
//! token while the service reports a token collision.
//!
//! # Attempt loop
//!
//! ```text
//! Attempting(n) ──status 10013, n < try_times──▶ CollisionRetry(n + 1) ──new uuid──▶ Attempting(n + 1)
//!      │
//!      └── any other reply, undecodable body, or budget spent ──▶ Done(reply?)
//! ```
//!
//! Transport errors are not retried; they abort the call.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::form::encode_form;
use crate::idempotency::generate_token;
use crate::ports::{HttpVerb, LogRecord, Params, Reply, RequestLog, Transport, TransportRequest};

// =============================================================================
// Constants
// =============================================================================

/// Status reported by the service when the request uuid was already used.
pub const UUID_DUPLICATED: i64 = 10013;

/// Envelope field names injected by the dispatcher.
pub const FIELD_METHOD: &str = "method";
pub const FIELD_SITE: &str = "site";
pub const FIELD_CALLERID: &str = "callerid";
pub const FIELD_UUID: &str = "uuid";

const FIELD_ACTION: &str = "action";
const FIELD_RESPONSE_BODY: &str = "response_body";
const ACTION_REQUEST: &str = "request";
const ACTION_RESPONSE: &str = "response";

// =============================================================================
// Dispatcher
// =============================================================================

/// Bounded state machine driving the attempts of one logical call.
#[derive(Debug)]
enum AttemptState {
    /// About to perform attempt `n` (1-based)
    Attempting(u32),
    /// Collision reported; attempt `n` needs a fresh token first
    CollisionRetry(u32),
    /// Call finished with the last decoded reply, if any
    Done(Option<Reply>),
}

/// Dispatches RPC calls to the stock service.
///
/// Holds no per-call state, so one instance can be shared across tasks.
pub struct RequestDispatcher {
    /// Immutable configuration
    config: ClientConfig,
    /// HTTP transport
    transport: Arc<dyn Transport>,
    /// Request/response record sink
    log: Arc<dyn RequestLog>,
}

impl RequestDispatcher {
    /// Create a dispatcher with explicit collaborators.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, log: Arc<dyn RequestLog>) -> Self {
        Self {
            config,
            transport,
            log,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform one logical call.
    ///
    /// Returns `Ok(Some(reply))` with the last decoded reply (which may still
    /// carry status 10013 when every attempt collided), `Ok(None)` when the
    /// body was not a JSON object, and `Err` on transport failure.
    pub async fn perform_request(&self, method: &str, params: Params) -> ClientResult<Option<Reply>> {
        let mut envelope = self.build_envelope(method, params);
        let url = self.config.entrance_url();
        let try_times = self.config.try_times();

        let mut state = AttemptState::Attempting(1);
        loop {
            state = match state {
                AttemptState::Attempting(attempt) => {
                    let reply = self.attempt(method, attempt, &url, &envelope).await?;

                    match reply {
                        Some(reply) if is_uuid_duplicated(&reply) && attempt < try_times => {
                            AttemptState::CollisionRetry(attempt + 1)
                        }
                        other => AttemptState::Done(other),
                    }
                }
                AttemptState::CollisionRetry(next_attempt) => {
                    let token = generate_token(self.config.callerid());
                    warn!(
                        method,
                        attempt = next_attempt,
                        uuid = %token,
                        "uuid duplicated, retrying with a new uuid"
                    );
                    envelope.insert(FIELD_UUID.to_string(), Value::String(token));
                    AttemptState::Attempting(next_attempt)
                }
                AttemptState::Done(reply) => return Ok(reply),
            };
        }
    }

    /// Perform one logical call with parameters taken from a serialisable value.
    ///
    /// The value must serialise to a JSON object.
    pub async fn perform<P>(&self, method: &str, params: &P) -> ClientResult<Option<Reply>>
    where
        P: Serialize + ?Sized,
    {
        match serde_json::to_value(params)? {
            Value::Object(map) => self.perform_request(method, map).await,
            other => Err(ClientError::Encode(format!(
                "parameters for {} must be an object, got {}",
                method, other
            ))),
        }
    }

    /// Merge method and public fields into the caller's parameters.
    ///
    /// Public fields win over caller-supplied keys of the same name.
    fn build_envelope(&self, method: &str, mut params: Params) -> Params {
        params.insert(FIELD_METHOD.to_string(), Value::String(method.to_string()));
        params.insert(FIELD_SITE.to_string(), Value::String(self.config.site().to_string()));
        params.insert(
            FIELD_CALLERID.to_string(),
            Value::String(self.config.callerid().to_string()),
        );
        params.insert(
            FIELD_UUID.to_string(),
            Value::String(generate_token(self.config.callerid())),
        );
        params
    }

    /// One request/response cycle, logged on both sides.
    async fn attempt(
        &self,
        method: &str,
        attempt: u32,
        url: &str,
        envelope: &Params,
    ) -> ClientResult<Option<Reply>> {
        self.log.write(with_action(envelope.clone(), ACTION_REQUEST));

        debug!(
            method,
            attempt,
            uuid = envelope.get(FIELD_UUID).and_then(serde_json::Value::as_str).unwrap_or_default(),
            "dispatching stock request"
        );

        let timeout = self.config.request_timeout();
        let request = TransportRequest {
            verb: HttpVerb::Post,
            url: url.to_string(),
            service_name: self.config.service_name().to_string(),
            form_params: encode_form(envelope),
            timeout,
            read_timeout: timeout,
            connect_timeout: timeout,
        };

        let body = self.transport.perform_request(request).await?;

        let reply = decode_reply(&body);
        match &reply {
            Some(reply) => {
                self.log.write(with_action(reply.clone(), ACTION_RESPONSE));
                debug!(method, attempt, status = ?status_of(reply), "stock response decoded");
            }
            None => {
                let mut record = LogRecord::new();
                record.insert(FIELD_RESPONSE_BODY.to_string(), Value::String(body.clone()));
                self.log.write(with_action(record, ACTION_RESPONSE));
                warn!(method, attempt, body_len = body.len(), "stock response is not a JSON object");
            }
        }

        Ok(reply)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Numeric `status` of a reply.
///
/// Accepts integers, integral floats and numeric strings, so `10013`,
/// `10013.0` and `"10013"` compare equal while `10013.7` does not.
pub fn status_of(reply: &Reply) -> Option<i64> {
    match reply.get("status")? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// True when the reply reports an idempotency token collision.
pub fn is_uuid_duplicated(reply: &Reply) -> bool {
    status_of(reply) == Some(UUID_DUPLICATED)
}

fn decode_reply(body: &str) -> Option<Reply> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn with_action(mut record: LogRecord, action: &str) -> LogRecord {
    record.insert(FIELD_ACTION.to_string(), Value::String(action.to_string()));
    record
}

// =============================================================================
// Tests
// =============================================================================
