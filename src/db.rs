use sqlx::postgres::{PgPool, PgPoolOptions};

// ============================================================================
// Database Bootstrap
// ============================================================================

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    tracing::info!("Connecting to Postgres...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Idempotent schema bootstrap; safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    const DDL: &[&str] = &[
        "CREATE TABLE IF NOT EXISTS accounts (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            unit_price NUMERIC(19, 4) NOT NULL,
            image_url TEXT
        )",
        "CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            account_id UUID NOT NULL REFERENCES accounts (id),
            placed_at TIMESTAMPTZ NOT NULL,
            total_amount NUMERIC(19, 4) NOT NULL,
            status TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS order_items (
            order_id UUID NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
            line_index INTEGER NOT NULL,
            product_id UUID NOT NULL,
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price NUMERIC(19, 4) NOT NULL,
            PRIMARY KEY (order_id, line_index)
        )",
        "CREATE INDEX IF NOT EXISTS orders_account_id_idx ON orders (account_id)",
    ];

    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Schema ready");
    Ok(())
}
