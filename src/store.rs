//! Product and order store.
//!
//! Collection-style operations over sqlite: `products`, `orders`, and a
//! `counters` table backing monotonically increasing order numbers. The
//! schema is created at startup; every function takes the shared pool.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;
use tracing::{debug, info};

/// Counter name backing order numbers.
pub const ORDERS_COUNTER: &str = "orders";

/// Status of a freshly placed order.
pub const ORDER_STATUS_OPEN: &str = "open";
/// Status once the administrator marks an order handled.
pub const ORDER_STATUS_DONE: &str = "done";

/// A product on sale.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub created_at: NaiveDateTime,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub number: i64,
    pub chat_id: i64,
    pub product_id: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Open order joined with its product name, for the admin panel view.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: i64,
    pub number: i64,
    pub chat_id: i64,
    pub product_name: String,
}

/// Initialize the store schema.
pub async fn init_store_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing store schema");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price_cents INTEGER NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create products table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            number INTEGER NOT NULL UNIQUE,
            chat_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL REFERENCES products(id),
            status TEXT NOT NULL DEFAULT 'open',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create orders table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS counters (
            name TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create counters table")?;

    info!("Store schema initialized");
    Ok(())
}

/// Add a product; returns its id.
pub async fn add_product(
    pool: &SqlitePool,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO products (name, price_cents, stock) VALUES (?1, ?2, ?3)",
    )
    .bind(name)
    .bind(price_cents)
    .bind(stock)
    .execute(pool)
    .await
    .context("Failed to insert product")?;

    let product_id = result.last_insert_rowid();
    info!(
        product_id = product_id,
        name = name,
        price_cents = price_cents,
        stock = stock,
        "product added"
    );
    Ok(product_id)
}

/// Fetch a product by id.
pub async fn get_product(pool: &SqlitePool, product_id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, price_cents, stock, created_at FROM products WHERE id = ?1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read product")?;

    debug!(product_id = product_id, found = product.is_some(), "product lookup");
    Ok(product)
}

/// Fetch a product by exact name, ignoring ASCII case.
pub async fn find_product_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, price_cents, stock, created_at FROM products
         WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to look up product by name")?;

    debug!(name = name, found = product.is_some(), "product name lookup");
    Ok(product)
}

/// All products, ordered by name.
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, price_cents, stock, created_at FROM products
         ORDER BY name COLLATE NOCASE ASC",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list products")
}

/// Adjust a product's stock by `delta` (may be negative). The stock never
/// drops below zero; a change that would is rejected. Returns whether a row
/// changed.
pub async fn increment_stock(pool: &SqlitePool, product_id: i64, delta: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock + ?1 WHERE id = ?2 AND stock + ?1 >= 0",
    )
    .bind(delta)
    .bind(product_id)
    .execute(pool)
    .await
    .context("Failed to adjust product stock")?;

    let changed = result.rows_affected() > 0;
    info!(
        product_id = product_id,
        delta = delta,
        changed = changed,
        "stock adjusted"
    );
    Ok(changed)
}

// Increment a named counter and return the new value. Runs on an existing
// connection so callers can make it part of a larger transaction.
async fn bump_counter(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    sqlx::query("INSERT INTO counters (name, value) VALUES (?1, 0) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await
        .context("Failed to seed counter")?;

    sqlx::query("UPDATE counters SET value = value + 1 WHERE name = ?1")
        .bind(name)
        .execute(&mut *conn)
        .await
        .context("Failed to increment counter")?;

    let value: i64 = sqlx::query_scalar("SELECT value FROM counters WHERE name = ?1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to read counter")?;

    Ok(value)
}

/// Increment a named counter and return the new value (1 on first use).
pub async fn next_counter(pool: &SqlitePool, name: &str) -> Result<i64> {
    let mut tx = pool.begin().await.context("Failed to begin counter transaction")?;
    let value = bump_counter(&mut *tx, name).await?;
    tx.commit().await.context("Failed to commit counter transaction")?;
    Ok(value)
}

/// Place an order for one unit of `product_id`.
///
/// Consumes one unit of stock and allocates the next order number, all in
/// one transaction. Returns `Ok(None)` when the product is out of stock (or
/// unknown); no stock or counter is consumed in that case.
pub async fn create_order(
    pool: &SqlitePool,
    chat_id: i64,
    product_id: i64,
) -> Result<Option<Order>> {
    let mut tx = pool.begin().await.context("Failed to begin order transaction")?;

    let consumed = sqlx::query(
        "UPDATE products SET stock = stock - 1 WHERE id = ?1 AND stock > 0",
    )
    .bind(product_id)
    .execute(&mut *tx)
    .await
    .context("Failed to consume stock")?
    .rows_affected();

    if consumed == 0 {
        debug!(product_id = product_id, "order rejected, no stock");
        return Ok(None);
    }

    let number = bump_counter(&mut *tx, ORDERS_COUNTER).await?;

    let order_id = sqlx::query(
        "INSERT INTO orders (number, chat_id, product_id, status) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(number)
    .bind(chat_id)
    .bind(product_id)
    .bind(ORDER_STATUS_OPEN)
    .execute(&mut *tx)
    .await
    .context("Failed to insert order")?
    .last_insert_rowid();

    tx.commit().await.context("Failed to commit order transaction")?;

    let order = sqlx::query_as::<_, Order>(
        "SELECT id, number, chat_id, product_id, status, created_at FROM orders WHERE id = ?1",
    )
    .bind(order_id)
    .fetch_one(pool)
    .await
    .context("Order row missing after insert")?;

    info!(
        order_id = order.id,
        number = order.number,
        chat_id = chat_id,
        product_id = product_id,
        "order placed"
    );
    Ok(Some(order))
}

/// Open orders with their product names, oldest first.
pub async fn list_open_orders(pool: &SqlitePool) -> Result<Vec<OrderSummary>> {
    sqlx::query_as::<_, OrderSummary>(
        "SELECT o.id, o.number, o.chat_id, p.name AS product_name
         FROM orders o JOIN products p ON p.id = o.product_id
         WHERE o.status = ?1
         ORDER BY o.number ASC",
    )
    .bind(ORDER_STATUS_OPEN)
    .fetch_all(pool)
    .await
    .context("Failed to list open orders")
}

/// Update an order's status. Returns whether the order existed.
pub async fn update_order_status(
    pool: &SqlitePool,
    order_id: i64,
    status: &str,
) -> Result<bool> {
    let result = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(order_id)
        .execute(pool)
        .await
        .context("Failed to update order status")?;

    let changed = result.rows_affected() > 0;
    info!(
        order_id = order_id,
        status = status,
        changed = changed,
        "order status updated"
    );
    Ok(changed)
}
