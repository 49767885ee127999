//! Stock Probe
//!
//! Queries the stock service once and prints the decoded reply. Useful to
//! check gateway settings from a deployment host.
//!
//! # Usage
//!
//! ```bash
//! # Query stock for goods 100 and 101
//! SSDK_STOCK_GATEWAY=http://stock.internal cargo run -p stock-probe -- 100 101
//!
//! # Include locked stock
//! STOCK_PROBE_LOCK=1 cargo run -p stock-probe -- 100
//! ```
//!
//! # Environment Variables
//!
//! - `SSDK_STOCK_*`: Client settings (gateway, entrance, timeout, try times, ...)
//! - `STOCK_PROBE_LOCK`: Include locked stock (default: 0)
//! - `RUST_LOG`: Log filter (default: stock_probe=info)

use anyhow::{bail, Context};
use stock_service::{status_of, StockQuery, StockService, StockSettings};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("stock_probe=info".parse()?)
                .add_directive("stock_service=info".parse()?),
        )
        .init();

    let goods_ids = std::env::args()
        .skip(1)
        .map(|arg| {
            arg.parse::<u64>()
                .with_context(|| format!("Invalid goods id: {}", arg))
        })
        .collect::<anyhow::Result<Vec<u64>>>()?;

    if goods_ids.is_empty() {
        bail!("Usage: stock-probe <goods_id>...");
    }

    let lock = std::env::var("STOCK_PROBE_LOCK")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let settings = StockSettings::from_env()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        gateway = %settings.gateway,
        goods = goods_ids.len(),
        "Stock probe"
    );

    let stock = StockService::from_settings(&settings)?;
    let reply = stock
        .get(&StockQuery::new(goods_ids).with_lock(lock))
        .await?;

    match reply {
        Some(reply) => {
            info!(status = ?status_of(&reply), "Stock reply received");
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
        None => {
            warn!("Stock reply could not be decoded");
            bail!("stock service returned an undecodable response")
        }
    }
}
