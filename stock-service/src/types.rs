//! Parameter types for stock operations.
//!
//! Each struct serialises to exactly the fields the remote method expects.
//! Flags travel as `0`/`1` integers.

use serde::{Serialize, Serializer};

// =============================================================================
// Change Type
// =============================================================================

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Increase stock
    Inc,
    /// Decrease stock
    Dec,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Inc => write!(f, "inc"),
            ChangeType::Dec => write!(f, "dec"),
        }
    }
}

// =============================================================================
// Stock Query
// =============================================================================

/// Parameters for `service.stock.get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockQuery {
    /// Goods to query
    pub goods_ids: Vec<u64>,
    /// Restrict returned SKUs to these product ids
    pub product_ids: Vec<u64>,
    /// Include locked stock
    #[serde(serialize_with = "as_flag")]
    pub lock: bool,
    /// Return stock for every SKU
    #[serde(serialize_with = "as_flag")]
    pub has_sku: bool,
}

impl StockQuery {
    pub fn new(goods_ids: Vec<u64>) -> Self {
        Self {
            goods_ids,
            ..Self::default()
        }
    }

    pub fn product_ids(mut self, product_ids: Vec<u64>) -> Self {
        self.product_ids = product_ids;
        self
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_sku(mut self, has_sku: bool) -> Self {
        self.has_sku = has_sku;
        self
    }
}

// =============================================================================
// Stock Change
// =============================================================================

/// Amount and target of a stock change, without its direction.
///
/// Passed to `incr`/`decr`, or paired with a [`ChangeType`] for `change`.
/// `remark` is sent only when non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAdjustment {
    /// Amount to change by
    pub stock: u64,
    /// Goods id
    pub goods_id: u64,
    /// Goods has multiple SKUs
    #[serde(serialize_with = "as_flag")]
    pub is_sku: bool,
    /// SKU id (0 when not a SKU change)
    pub product_id: u64,
    /// Free-text note stored with the change
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remark: String,
    /// Business scene the change belongs to
    pub scene_id: u64,
}

impl StockAdjustment {
    pub fn new(stock: u64, goods_id: u64) -> Self {
        Self {
            stock,
            goods_id,
            is_sku: false,
            product_id: 0,
            remark: String::new(),
            scene_id: 0,
        }
    }

    /// Target a specific SKU of a multi-SKU goods.
    pub fn sku(mut self, product_id: u64) -> Self {
        self.is_sku = true;
        self.product_id = product_id;
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    pub fn scene(mut self, scene_id: u64) -> Self {
        self.scene_id = scene_id;
        self
    }

    /// Pair with a direction.
    pub fn with_type(self, change_type: ChangeType) -> StockChange {
        StockChange {
            adjustment: self,
            change_type,
        }
    }
}

/// Parameters for `service.stock.change`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockChange {
    #[serde(flatten)]
    pub adjustment: StockAdjustment,
    /// Increase or decrease
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

impl StockChange {
    pub fn new(stock: u64, goods_id: u64, change_type: ChangeType) -> Self {
        StockAdjustment::new(stock, goods_id).with_type(change_type)
    }
}

// =============================================================================
// Lock Query
// =============================================================================

/// Parameters for `service.stock.lock.get`.
///
/// `product_id` is sent only when greater than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockQuery {
    pub goods_id: u64,
    /// Business scene that holds the lock (e.g. "order")
    pub source: String,
    /// Business entity id within the scene
    pub source_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub product_id: u64,
}

impl LockQuery {
    pub fn new(goods_id: u64, source: impl Into<String>, source_id: u64) -> Self {
        Self {
            goods_id,
            source: source.into(),
            source_id,
            product_id: 0,
        }
    }

    pub fn product(mut self, product_id: u64) -> Self {
        self.product_id = product_id;
        self
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
