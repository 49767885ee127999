//! Stock operations catalog.
//!
//! Maps each domain call onto a remote method name and its parameters, then
//! hands it to the [`RequestDispatcher`]. No retries or I/O happen here.
//!
//! Every operation returns the decoded reply untouched. Remote errors stay
//! inside the reply (`status`, `msg`); `Ok(None)` means the body could not be
//! decoded and must be treated as a failure.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use stock_client::{
    ClientConfig, ClientResult, FileRequestLog, LogConfig, Params, Reply, ReqwestTransport,
    RequestDispatcher, StockSettings,
};

use crate::types::{ChangeType, LockQuery, StockAdjustment, StockChange, StockQuery};

// =============================================================================
// Remote Methods
// =============================================================================

/// Create stock records
pub const SERVICE_STOCK_ADD: &str = "service.stock.add";
/// Increase or decrease stock
pub const SERVICE_STOCK_CHANGE: &str = "service.stock.change";
/// Query stock
pub const SERVICE_STOCK_GET: &str = "service.stock.get";
/// Delete stock records
pub const SERVICE_STOCK_DELETE: &str = "service.stock.delete";
/// Create, update or release locked stock
pub const SERVICE_STOCK_LOCK_CHANGE: &str = "service.stock.lock.change";
/// Query locked stock
pub const SERVICE_STOCK_LOCK_GET: &str = "service.stock.lock.get";

// =============================================================================
// Stock Service
// =============================================================================

/// Typed client for the stock service.
///
/// Cheap to clone; clones share one dispatcher.
#[derive(Clone)]
pub struct StockService {
    dispatcher: Arc<RequestDispatcher>,
}

impl StockService {
    /// Create a service on top of an existing dispatcher.
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Wire a service from settings: reqwest transport plus file request log.
    pub fn from_settings(settings: &StockSettings) -> ClientResult<Self> {
        let config = ClientConfig::new(settings);
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);
        let log = Arc::new(FileRequestLog::new(&LogConfig::new(settings)));

        info!(
            url = %config.entrance_url(),
            service = config.service_name(),
            try_times = config.try_times(),
            request_log = log.is_enabled(),
            "Stock service client configured"
        );

        Ok(Self::new(Arc::new(RequestDispatcher::new(config, transport, log))))
    }

    /// Wire a service from `SSDK_STOCK_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_settings(&StockSettings::from_env()?)
    }

    /// Underlying dispatcher.
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Initialise stock for a batch of goods.
    ///
    /// `items` is sent JSON-encoded in the `datainfo` field.
    pub async fn set<T: Serialize>(&self, items: &[T]) -> ClientResult<Option<Reply>> {
        self.dispatcher
            .perform_request(SERVICE_STOCK_ADD, datainfo(items)?)
            .await
    }

    /// Query stock for goods.
    pub async fn get(&self, query: &StockQuery) -> ClientResult<Option<Reply>> {
        self.dispatcher.perform(SERVICE_STOCK_GET, query).await
    }

    /// Increase or decrease stock as described by `change`.
    pub async fn change(&self, change: &StockChange) -> ClientResult<Option<Reply>> {
        self.dispatcher.perform(SERVICE_STOCK_CHANGE, change).await
    }

    /// Increase stock (`type=inc`).
    pub async fn incr(&self, adjustment: StockAdjustment) -> ClientResult<Option<Reply>> {
        self.change(&adjustment.with_type(ChangeType::Inc)).await
    }

    /// Decrease stock (`type=dec`).
    pub async fn decr(&self, adjustment: StockAdjustment) -> ClientResult<Option<Reply>> {
        self.change(&adjustment.with_type(ChangeType::Dec)).await
    }

    /// Delete stock records.
    ///
    /// `items` is sent JSON-encoded in the `datainfo` field.
    pub async fn delete<T: Serialize>(&self, items: &[T]) -> ClientResult<Option<Reply>> {
        self.dispatcher
            .perform_request(SERVICE_STOCK_DELETE, datainfo(items)?)
            .await
    }

    /// Create, update or release locked stock.
    ///
    /// `data` is sent under the `data` field.
    pub async fn change_lock<T>(&self, data: &T) -> ClientResult<Option<Reply>>
    where
        T: Serialize + ?Sized,
    {
        let mut params = Params::new();
        params.insert("data".to_string(), serde_json::to_value(data)?);
        self.dispatcher
            .perform_request(SERVICE_STOCK_LOCK_CHANGE, params)
            .await
    }

    /// Query locked stock held by a business entity.
    pub async fn get_lock(&self, query: &LockQuery) -> ClientResult<Option<Reply>> {
        self.dispatcher.perform(SERVICE_STOCK_LOCK_GET, query).await
    }
}

fn datainfo<T: Serialize>(items: &[T]) -> ClientResult<Params> {
    let mut params = Params::new();
    params.insert(
        "datainfo".to_string(),
        Value::String(serde_json::to_string(items)?),
    );
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datainfo_is_json_string() {
        let items = vec![json!({ "goods_id": 1, "stock": 10 })];

        let params = datainfo(&items).unwrap();

        assert_eq!(params["datainfo"], json!(r#"[{"goods_id":1,"stock":10}]"#));
    }

    #[test]
    fn test_from_settings_builds_service() {
        let mut settings = StockSettings::from_lookup(|_| None).unwrap();
        settings.gateway = "http://stock.internal".to_string();
        settings.try_times = 9;
        settings.log_switch = false;

        let service = StockService::from_settings(&settings).unwrap();

        assert_eq!(service.dispatcher().config().try_times(), 3);
        assert_eq!(
            service.dispatcher().config().entrance_url(),
            "http://stock.internal/router/rest"
        );
    }
}
