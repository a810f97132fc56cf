// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order creation outcomes (created vs failed, by failure reason)
// - Order aggregation latency and per-order item counts
// - Query traffic (full listing vs per-account)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub orders_failed: IntCounterVec,
    pub order_processing_duration: Histogram,
    pub order_items_per_order: Histogram,
    pub order_queries: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new(
            "orders_created_total",
            "Total orders successfully persisted",
        )?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_failed = IntCounterVec::new(
            Opts::new("orders_failed_total", "Total order creations aborted"),
            &["reason"],
        )?;
        registry.register(Box::new(orders_failed.clone()))?;

        let order_processing_duration = Histogram::with_opts(
            HistogramOpts::new(
                "order_processing_duration_seconds",
                "Order aggregation and persistence duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(order_processing_duration.clone()))?;

        let order_items_per_order = Histogram::with_opts(
            HistogramOpts::new("order_items_per_order", "Line items per persisted order")
                .buckets(vec![1.0, 2.0, 3.0, 5.0, 10.0, 25.0, 50.0]),
        )?;
        registry.register(Box::new(order_items_per_order.clone()))?;

        let order_queries = IntCounterVec::new(
            Opts::new("order_queries_total", "Order list queries served"),
            &["scope"],
        )?;
        registry.register(Box::new(order_queries.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_failed,
            order_processing_duration,
            order_items_per_order,
            order_queries,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record a successfully persisted order
    pub fn record_order_created(&self, item_count: usize, duration_secs: f64) {
        self.orders_created.inc();
        self.order_items_per_order.observe(item_count as f64);
        self.order_processing_duration.observe(duration_secs);
    }

    /// Helper to record an aborted order creation
    pub fn record_order_failed(&self, reason: &str) {
        self.orders_failed.with_label_values(&[reason]).inc();
    }

    /// Helper to record a served list query
    pub fn record_order_query(&self, scope: &str) {
        self.order_queries.with_label_values(&[scope]).inc();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
