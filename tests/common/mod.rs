#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::time::Duration;

use farmavida_backend::config::DatabaseConfig;
use farmavida_backend::database::{create_pool, run_migrations};
use farmavida_backend::models::{CartLine, CreateOrderRequest};
use farmavida_backend::services::OrderService;
use sqlx::SqlitePool;

/// In-memory database with migrations applied. A single connection so every
/// handle sees the same database.
pub async fn setup_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

pub fn order_service(pool: &SqlitePool) -> OrderService {
    OrderService::new(pool.clone(), Duration::from_secs(5))
}

pub async fn seed_user(pool: &SqlitePool, name: &str, email: &str) -> i64 {
    sqlx::query(
        "INSERT INTO users (name, email, password, phone) VALUES (?, ?, 'x', '555-0100')",
    )
    .bind(name)
    .bind(email)
    .execute(pool)
    .await
    .expect("seed user")
    .last_insert_rowid()
}

pub async fn seed_product(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> i64 {
    sqlx::query("INSERT INTO products (name, category, price, stock) VALUES (?, 'Analgesics', ?, ?)")
        .bind(name)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await
        .expect("seed product")
        .last_insert_rowid()
}

pub async fn set_currency_rate(pool: &SqlitePool, rate: f64) {
    sqlx::query("UPDATE cms_settings SET currency_rate = ? WHERE id = 1")
        .bind(rate)
        .execute(pool)
        .await
        .expect("set rate");
}

pub async fn stock_of(pool: &SqlitePool, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("stock")
}

pub async fn order_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .expect("order count")
}

pub async fn line_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_details")
        .fetch_one(pool)
        .await
        .expect("line count")
}

pub fn cart(user_id: i64, lines: &[(i64, i64, f64)]) -> CreateOrderRequest {
    let items: Vec<CartLine> = lines
        .iter()
        .map(|&(product_id, quantity, price)| CartLine {
            product_id,
            quantity,
            price,
        })
        .collect();
    let total = items.iter().map(|l| l.price * l.quantity as f64).sum();

    CreateOrderRequest {
        user_id,
        total,
        items,
    }
}
