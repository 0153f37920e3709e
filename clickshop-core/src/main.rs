use std::sync::Arc;

use clickshop_core::api;
use clickshop_core::config::Config;
use clickshop_core::shop::Shop;
use clickshop_core::store::FileStore;
use clickshop_core::AppState;
use dotenv::dotenv;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting Click Shop Core Server...");

    let config = Config::from_env()?;

    // Open the persistent store and hand it to the owning shop service
    let store = FileStore::open(&config.data_dir)?;
    let shop = Shop::open(store)?;
    let report = shop.load_report();
    if report.is_clean() {
        info!("Store opened clean from {}", config.data_dir.display());
    } else {
        warn!(
            "Store opened degraded; corrupt sections started empty: {:?}",
            report.corrupt_keys
        );
    }

    let state = AppState {
        shop: Arc::new(shop),
        config: Arc::new(config.clone()),
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}:{}: {}", config.host, config.port, e))?;

    info!("Server listening on {}:{}", config.host, config.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
