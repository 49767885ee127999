//! Stock Service SDK
//!
//! Typed operations for the stock microservice: create, query, adjust,
//! lock and delete stock records.
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_service::{StockAdjustment, StockQuery, StockService};
//!
//! let stock = StockService::from_env()?;
//!
//! let reply = stock.get(&StockQuery::new(vec![100]).with_lock(true)).await?;
//! stock.decr(StockAdjustment::new(1, 100).remark("order 42")).await?;
//! ```

#![warn(clippy::all)]

pub mod service;
pub mod types;

// Re-exports for convenience
pub use service::{
    StockService, SERVICE_STOCK_ADD, SERVICE_STOCK_CHANGE, SERVICE_STOCK_DELETE, SERVICE_STOCK_GET,
    SERVICE_STOCK_LOCK_CHANGE, SERVICE_STOCK_LOCK_GET,
};
pub use types::{ChangeType, LockQuery, StockAdjustment, StockChange, StockQuery};

pub use stock_client::{status_of, ClientError, ClientResult, Reply, StockSettings};
