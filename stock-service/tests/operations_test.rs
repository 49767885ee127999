//! Stock operations end to end over a scripted transport.
//!
//! Checks the method name and form fields each operation puts on the wire.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use stock_client::{
    ClientConfig, MemoryRequestLog, RequestDispatcher, ScriptedTransport, StockSettings,
    TransportRequest,
};
use stock_service::{
    status_of, ChangeType, LockQuery, StockAdjustment, StockQuery, StockService, SERVICE_STOCK_ADD,
    SERVICE_STOCK_CHANGE, SERVICE_STOCK_DELETE, SERVICE_STOCK_GET, SERVICE_STOCK_LOCK_CHANGE,
    SERVICE_STOCK_LOCK_GET,
};

// =============================================================================
// Helpers
// =============================================================================

struct Harness {
    service: StockService,
    transport: Arc<ScriptedTransport>,
    log: Arc<MemoryRequestLog>,
}

fn harness() -> Harness {
    let mut settings = StockSettings::from_lookup(|_| None).unwrap();
    settings.gateway = "http://stock.internal".to_string();
    settings.callerid = "mall".to_string();
    settings.site = "shop".to_string();
    settings.try_times = 3;

    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(r#"{"status": 200, "data": []}"#);
    let log = Arc::new(MemoryRequestLog::new());

    let dispatcher = RequestDispatcher::new(
        ClientConfig::new(&settings),
        transport.clone(),
        log.clone(),
    );

    Harness {
        service: StockService::new(Arc::new(dispatcher)),
        transport,
        log,
    }
}

impl Harness {
    fn only_request(&self) -> TransportRequest {
        let requests = self.transport.requests();
        assert_eq!(requests.len(), 1);
        requests.into_iter().next().unwrap()
    }
}

#[derive(Serialize)]
struct StockItem {
    goods_id: u64,
    stock: u64,
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_set_sends_datainfo_json() {
    let h = harness();
    let items = vec![json!({ "goods_id": 1, "stock": 10 })];

    let reply = h.service.set(&items).await.unwrap().unwrap();

    let request = h.only_request();
    assert_eq!(request.field("method"), Some(SERVICE_STOCK_ADD));
    assert_eq!(
        request.field("datainfo"),
        Some(serde_json::to_string(&items).unwrap().as_str())
    );
    assert_eq!(status_of(&reply), Some(200));
}

#[tokio::test]
async fn test_set_accepts_typed_items() {
    let h = harness();
    let items = [StockItem { goods_id: 1, stock: 10 }, StockItem { goods_id: 2, stock: 0 }];

    h.service.set(&items).await.unwrap();

    let request = h.only_request();
    assert_eq!(
        request.field("datainfo"),
        Some(r#"[{"goods_id":1,"stock":10},{"goods_id":2,"stock":0}]"#)
    );
}

#[tokio::test]
async fn test_get_passes_query_fields() {
    let h = harness();
    let query = StockQuery::new(vec![100, 101]).product_ids(vec![7]).with_sku(true);

    h.service.get(&query).await.unwrap();

    let request = h.only_request();
    assert_eq!(request.field("method"), Some(SERVICE_STOCK_GET));
    assert_eq!(request.field("goods_ids[0]"), Some("100"));
    assert_eq!(request.field("goods_ids[1]"), Some("101"));
    assert_eq!(request.field("product_ids[0]"), Some("7"));
    assert_eq!(request.field("lock"), Some("0"));
    assert_eq!(request.field("has_sku"), Some("1"));
}

#[tokio::test]
async fn test_change_without_remark_omits_field() {
    let h = harness();

    h.service
        .change(&StockAdjustment::new(5, 100).remark("").with_type(ChangeType::Inc))
        .await
        .unwrap();

    let request = h.only_request();
    assert_eq!(request.field("method"), Some(SERVICE_STOCK_CHANGE));
    assert_eq!(request.field("stock"), Some("5"));
    assert_eq!(request.field("goods_id"), Some("100"));
    assert_eq!(request.field("type"), Some("inc"));
    assert_eq!(request.field("is_sku"), Some("0"));
    assert_eq!(request.field("product_id"), Some("0"));
    assert_eq!(request.field("scene_id"), Some("0"));
    assert_eq!(request.field("remark"), None);
}

#[tokio::test]
async fn test_change_with_remark_includes_field() {
    let h = harness();

    h.service
        .change(&StockAdjustment::new(5, 100).remark("restock").with_type(ChangeType::Inc))
        .await
        .unwrap();

    assert_eq!(h.only_request().field("remark"), Some("restock"));
}

#[tokio::test]
async fn test_incr_and_decr_set_change_type() {
    let h = harness();
    h.transport.push_body(r#"{"status": 200}"#);

    h.service
        .incr(StockAdjustment::new(3, 100))
        .await
        .unwrap();
    h.service
        .decr(StockAdjustment::new(3, 100).sku(8))
        .await
        .unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].field("method"), Some(SERVICE_STOCK_CHANGE));
    assert_eq!(requests[0].field("type"), Some("inc"));
    assert_eq!(requests[1].field("type"), Some("dec"));
    assert_eq!(requests[1].field("is_sku"), Some("1"));
    assert_eq!(requests[1].field("product_id"), Some("8"));
}

#[tokio::test]
async fn test_delete_sends_datainfo_json() {
    let h = harness();
    let items = vec![json!({ "goods_id": 1 }), json!({ "goods_id": 2 })];

    h.service.delete(&items).await.unwrap();

    let request = h.only_request();
    assert_eq!(request.field("method"), Some(SERVICE_STOCK_DELETE));
    assert_eq!(request.field("datainfo"), Some(r#"[{"goods_id":1},{"goods_id":2}]"#));
}

#[tokio::test]
async fn test_change_lock_wraps_data() {
    let h = harness();
    let data = json!([{ "goods_id": 1, "source": "order", "source_id": 9, "stock": 2 }]);

    h.service.change_lock(&data).await.unwrap();

    let request = h.only_request();
    assert_eq!(request.field("method"), Some(SERVICE_STOCK_LOCK_CHANGE));
    assert_eq!(request.field("data[0][goods_id]"), Some("1"));
    assert_eq!(request.field("data[0][source]"), Some("order"));
    assert_eq!(request.field("data[0][source_id]"), Some("9"));
    assert_eq!(request.field("data[0][stock]"), Some("2"));

    let records = h.log.records();
    assert_eq!(records[0]["data"], data);
}

#[tokio::test]
async fn test_get_lock_omits_zero_product_id() {
    let h = harness();

    h.service.get_lock(&LockQuery::new(1, "order", 9)).await.unwrap();

    let request = h.only_request();
    assert_eq!(request.field("method"), Some(SERVICE_STOCK_LOCK_GET));
    assert_eq!(request.field("goods_id"), Some("1"));
    assert_eq!(request.field("source"), Some("order"));
    assert_eq!(request.field("source_id"), Some("9"));
    assert_eq!(request.field("product_id"), None);
}

#[tokio::test]
async fn test_get_lock_includes_positive_product_id() {
    let h = harness();

    h.service
        .get_lock(&LockQuery::new(1, "order", 9).product(7))
        .await
        .unwrap();

    assert_eq!(h.only_request().field("product_id"), Some("7"));
}

#[tokio::test]
async fn test_remote_error_passed_through() {
    let mut settings = StockSettings::from_lookup(|_| None).unwrap();
    settings.gateway = "http://stock.internal".to_string();
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(r#"{"status": 40004, "msg": "stock not enough"}"#);
    let service = StockService::new(Arc::new(RequestDispatcher::new(
        ClientConfig::new(&settings),
        transport.clone(),
        Arc::new(MemoryRequestLog::new()),
    )));

    let reply = service
        .decr(StockAdjustment::new(100, 1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(status_of(&reply), Some(40004));
    assert_eq!(reply["msg"], json!("stock not enough"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_every_request_carries_envelope() {
    let h = harness();

    h.service.get(&StockQuery::new(vec![1])).await.unwrap();

    let request = h.only_request();
    for field in ["method", "site", "callerid", "uuid"] {
        assert!(request.field(field).is_some(), "missing {}", field);
    }
    assert_eq!(request.field("site"), Some("shop"));
    assert_eq!(request.field("callerid"), Some("mall"));
}
