//! Stock Service Client
//!
//! Request dispatch for the stock microservice RPC gateway.
//!
//! # Architecture
//!
//! ```text
//! StockService → RequestDispatcher → Transport → gateway → stock service
//!                       │
//!                       └──▶ RequestLog (request/response records)
//! ```
//!
//! # Components
//!
//! - **Config**: Raw settings from the environment and the immutable client config
//! - **Ports**: Traits for the HTTP transport and the request log sink
//! - **Dispatcher**: Envelope assembly, attempt loop, uuid collision recovery
//! - **Adapters**: `ReqwestTransport`, `FileRequestLog`
//! - **Stub**: Test implementations
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_client::{ClientConfig, FileRequestLog, LogConfig, ReqwestTransport, RequestDispatcher, StockSettings};
//! use std::sync::Arc;
//!
//! let settings = StockSettings::from_env()?;
//! let config = ClientConfig::new(&settings);
//! let transport = Arc::new(ReqwestTransport::from_config(&config)?);
//! let log = Arc::new(FileRequestLog::new(&LogConfig::new(&settings)));
//!
//! let dispatcher = RequestDispatcher::new(config, transport, log);
//! let reply = dispatcher.perform_request("service.stock.get", params).await?;
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod form;
pub mod http;
pub mod idempotency;
pub mod ports;
pub mod request_log;
pub mod stub;

// Re-exports for convenience
pub use config::{ClientConfig, LogConfig, StockSettings, MAX_TRY_TIMES};
pub use dispatcher::{is_uuid_duplicated, status_of, RequestDispatcher, UUID_DUPLICATED};
pub use error::{ClientError, ClientResult, TransportError};
pub use http::ReqwestTransport;
pub use idempotency::generate_token;
pub use ports::{HttpVerb, LogRecord, Params, Reply, RequestLog, Transport, TransportRequest};
pub use request_log::{FileRequestLog, NoopRequestLog};
pub use stub::{MemoryRequestLog, ScriptedTransport};
