use std::time::Duration;

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};

use crate::error::{is_check_violation, is_unique_violation, AppError, AppResult};
use crate::models::*;
use crate::utils::generate_tracking_number;

/// Attempts before giving up on finding a free tracking number. With a
/// 90-million-value space the loop practically never runs twice; the cap only
/// exists so termination is provable.
const MAX_TRACKING_ATTEMPTS: u32 = 40;

#[derive(FromRow)]
struct ProductSnapshot {
    name: String,
    price: f64,
    stock: i64,
}

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    tx_timeout: Duration,
}

impl OrderService {
    pub fn new(pool: SqlitePool, tx_timeout: Duration) -> Self {
        Self { pool, tx_timeout }
    }

    /// Place an order atomically: validate stock, reserve a unique tracking
    /// number, freeze name/price/rate snapshots, decrement inventory and
    /// persist the order with its lines. Any failure rolls the whole
    /// transaction back.
    pub async fn place_order(
        &self,
        user_id: i64,
        request: &CreateOrderRequest,
    ) -> AppResult<OrderCreated> {
        if request.items.is_empty() {
            return Err(AppError::ValidationError("cart is empty".to_string()));
        }
        for item in &request.items {
            if item.quantity <= 0 {
                return Err(AppError::ValidationError(format!(
                    "invalid quantity {} for product {}",
                    item.quantity, item.product_id
                )));
            }
            if !item.price.is_finite() || item.price < 0.0 {
                return Err(AppError::ValidationError(format!(
                    "invalid price for product {}",
                    item.product_id
                )));
            }
        }

        // The transaction carries a bounded timeout; on expiry the future is
        // dropped, the store rolls back and the caller gets a retryable 503.
        tokio::time::timeout(self.tx_timeout, self.place_order_tx(user_id, request))
            .await
            .map_err(|_| AppError::Timeout)?
    }

    async fn place_order_tx(
        &self,
        user_id: i64,
        request: &CreateOrderRequest,
    ) -> AppResult<OrderCreated> {
        let mut tx = self.pool.begin().await?;

        // Rate snapshot. A missing CMS row is not an error.
        let rate: f64 =
            sqlx::query_scalar("SELECT currency_rate FROM cms_settings WHERE id = 1")
                .fetch_optional(&mut *tx)
                .await?
                .unwrap_or(0.0);

        // Validate every line against live stock and freeze the display
        // names before anything is written.
        let mut frozen_names = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = sqlx::query_as::<_, ProductSnapshot>(
                "SELECT name, price, stock FROM products WHERE id = ?",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Product {} not found", item.product_id))
            })?;

            if product.stock < item.quantity {
                return Err(AppError::InsufficientStock {
                    product_name: product.name,
                    available: product.stock,
                    requested: item.quantity,
                });
            }

            if (product.price - item.price).abs() > f64::EPSILON {
                log::warn!(
                    "Cart price {} for product {} differs from catalog price {}",
                    item.price,
                    item.product_id,
                    product.price
                );
            }

            frozen_names.push(product.name);
        }

        // The stored total is always the sum of the frozen lines.
        let total: f64 = request
            .items
            .iter()
            .map(|i| i.price * i.quantity as f64)
            .sum();
        if (total - request.total).abs() > 0.005 {
            log::warn!(
                "Client total {} disagrees with computed total {total}",
                request.total
            );
        }

        let created_at = Utc::now();

        // Draw tracking numbers until one inserts cleanly. The UNIQUE column
        // is the authoritative guard; the pre-insert lookup just avoids
        // burning attempts. Bounded so termination is provable.
        let mut created: Option<(i64, String)> = None;
        for _ in 0..MAX_TRACKING_ATTEMPTS {
            let candidate = generate_tracking_number();

            let exists: Option<i64> =
                sqlx::query_scalar("SELECT id FROM orders WHERE tracking_number = ?")
                    .bind(&candidate)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_some() {
                continue;
            }

            let result = sqlx::query(
                "INSERT INTO orders (user_id, total, status, created_at, tracking_number, exchange_rate_snapshot) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(total)
            .bind(OrderStatus::Pending)
            .bind(created_at)
            .bind(&candidate)
            .bind(rate)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(r) => {
                    created = Some((r.last_insert_rowid(), candidate));
                    break;
                }
                // A concurrent order won the same number between our lookup
                // and the insert. Redraw.
                Err(e) if is_unique_violation(&e, "tracking_number") => continue,
                Err(e) => return Err(e.into()),
            }
        }
        let (order_id, tracking_number) = created.ok_or_else(|| {
            AppError::InternalError("tracking number attempts exhausted".to_string())
        })?;

        // Insert the frozen lines and decrement stock, in validated order.
        for (item, frozen_name) in request.items.iter().zip(&frozen_names) {
            sqlx::query(
                "INSERT INTO order_details (order_id, product_id, product_name, quantity, price_at_purchase) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(frozen_name)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;

            // Conditional decrement: the row count is the sufficiency check,
            // so there is no window for another transaction to slip between
            // a read and the write.
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?",
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(r) if r.rows_affected() == 0 => {
                    return Err(AppError::StockConstraint(format!(
                        "stock for product {} changed during checkout",
                        item.product_id
                    )));
                }
                Ok(_) => {}
                Err(e) if is_check_violation(&e) => {
                    return Err(AppError::StockConstraint(e.to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }

        tx.commit().await?;

        log::info!("Order #{order_id} created, tracking {tracking_number}, rate {rate}");

        Ok(OrderCreated {
            order_id,
            tracking_number,
        })
    }

    /// All orders with the buyer's contact info and frozen lines, newest
    /// first. Lines are read from order_details only, so orders stay visible
    /// after the referenced product is deleted.
    pub async fn get_all_orders(&self) -> AppResult<Vec<AdminOrderView>> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            "SELECT o.id, o.total, o.status, o.created_at, o.tracking_number, o.exchange_rate_snapshot, \
                    u.name AS user_name, u.email AS user_email, u.phone AS user_phone \
             FROM orders o \
             JOIN users u ON o.user_id = u.id \
             ORDER BY o.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.fetch_order_lines(row.id).await?;
            orders.push(AdminOrderView { order: row, items });
        }

        Ok(orders)
    }

    pub async fn get_user_orders(&self, user_id: i64) -> AppResult<Vec<OrderWithItems>> {
        let rows = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, total, status, created_at, tracking_number, exchange_rate_snapshot \
             FROM orders \
             WHERE user_id = ? \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for order in rows {
            let items = self.fetch_order_lines(order.id).await?;
            orders.push(OrderWithItems { order, items });
        }

        Ok(orders)
    }

    async fn fetch_order_lines(&self, order_id: i64) -> AppResult<Vec<OrderLineView>> {
        let lines = sqlx::query_as::<_, OrderLineView>(
            "SELECT product_name AS name, quantity, price_at_purchase AS price \
             FROM order_details \
             WHERE order_id = ?",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Update an order's status. Transitions are forward-only
    /// (Pending -> Shipped -> Delivered); setting the current status again
    /// is accepted as a no-op.
    pub async fn update_status(&self, order_id: i64, status: OrderStatus) -> AppResult<()> {
        let current: OrderStatus =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))?;

        if !current.can_transition_to(status) {
            return Err(AppError::ValidationError(format!(
                "cannot move order from {current} back to {status}"
            )));
        }

        sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delivered sales totals grouped by calendar month, chronological.
    pub async fn get_sales_stats(&self) -> AppResult<Vec<MonthlySales>> {
        let stats = sqlx::query_as::<_, MonthlySales>(
            "SELECT strftime('%Y-%m', created_at) AS month, SUM(total) AS total \
             FROM orders \
             WHERE status = 'Delivered' \
             GROUP BY strftime('%Y-%m', created_at) \
             ORDER BY month ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}
