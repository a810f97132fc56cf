use std::sync::Arc;

use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod db;
mod domain;
mod metrics;
mod store;

use domain::account::{AccountInput, AccountService};
use domain::order::{OrderItemRequest, OrderService};
use domain::product::{ProductInput, ProductService};
use store::{
    AccountStore, MemoryAccountStore, MemoryOrderStore, MemoryProductStore, OrderStore,
    PgAccountStore, PgOrderStore, PgProductStore, ProductStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug")),
        )
        .init();

    tracing::info!("🚀 Starting storefront ordering service");

    let cfg = config::Config::from_env();

    // === 1. Initialize Prometheus metrics ===
    tracing::info!("Initializing metrics");
    let metrics = Arc::new(metrics::Metrics::new()?);

    // Start metrics HTTP server in background thread
    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = cfg.metrics_port;
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("metrics runtime");
        rt.block_on(async {
            if let Err(e) = metrics::start_metrics_server(metrics_registry, metrics_port).await {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    });

    // === 2. Wire the stores ===
    let (accounts, products, orders): (
        Arc<dyn AccountStore>,
        Arc<dyn ProductStore>,
        Arc<dyn OrderStore>,
    ) = match cfg.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect(url, cfg.db_max_connections).await?;
            db::ensure_schema(&pool).await?;
            tracing::info!("🗄️ Using Postgres stores");
            (
                Arc::new(PgAccountStore::new(pool.clone())),
                Arc::new(PgProductStore::new(pool.clone())),
                Arc::new(PgOrderStore::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running on in-memory stores");
            (
                Arc::new(MemoryAccountStore::new()),
                Arc::new(MemoryProductStore::new()),
                Arc::new(MemoryOrderStore::new()),
            )
        }
    };

    // === 3. Build the services ===
    let account_service = AccountService::new(accounts.clone());
    let product_service = ProductService::new(products.clone());
    let order_service = OrderService::new(accounts, products, orders, metrics.clone());

    // === 4. Demonstrate order creation with price snapshotting ===
    tracing::info!("📝 Demonstrating the order lifecycle");

    let buyer = account_service
        .create(AccountInput {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "difference-engine".to_string(),
        })
        .await?;

    let keyboard = product_service
        .create(ProductInput {
            name: "Mechanical Keyboard".to_string(),
            description: "Tenkeyless, brown switches".to_string(),
            unit_price: "89.00".parse::<Decimal>()?,
            image_url: None,
        })
        .await?;

    let monitor = product_service
        .create(ProductInput {
            name: "27\" Monitor".to_string(),
            description: "1440p IPS panel".to_string(),
            unit_price: "249.50".parse::<Decimal>()?,
            image_url: Some("https://cdn.example.com/monitor.png".to_string()),
        })
        .await?;

    let order = order_service
        .create_order(
            buyer.id,
            vec![
                OrderItemRequest {
                    product_id: keyboard.id,
                    quantity: 2,
                },
                OrderItemRequest {
                    product_id: monitor.id,
                    quantity: 1,
                },
            ],
        )
        .await?;

    tracing::info!("✅ Order created: {} (total {})", order.id, order.total_amount);

    // Raise the live keyboard price; the persisted order must not move.
    product_service
        .update(
            keyboard.id,
            ProductInput {
                name: "Mechanical Keyboard".to_string(),
                description: "Tenkeyless, brown switches".to_string(),
                unit_price: "119.00".parse::<Decimal>()?,
                image_url: None,
            },
        )
        .await?;

    let after = order_service.list_for_account(buyer.id).await?;
    tracing::info!(
        "✅ Total after catalog price change: {} (snapshot held)",
        after[0].total_amount
    );

    // A request naming an unknown product persists nothing.
    let phantom = uuid::Uuid::new_v4();
    if let Err(e) = order_service
        .create_order(
            buyer.id,
            vec![OrderItemRequest {
                product_id: phantom,
                quantity: 1,
            }],
        )
        .await
    {
        tracing::info!("✅ Rejected as expected: {}", e);
    }

    let all = order_service.list_all().await?;
    tracing::info!("🎉 Demo complete, {} order(s) on record", all.len());

    Ok(())
}
