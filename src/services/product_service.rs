use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::*;

const PRODUCT_COLUMNS: &str = "id, name, description, category, price, stock, img_url, \
                               has_discount, discount_percent, discount_ends_at";

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn get_product(&self, id: i64) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
    }

    pub async fn create_product(&self, request: &SaveProductRequest) -> AppResult<i64> {
        if request.stock < 0 {
            return Err(AppError::ValidationError(
                "stock cannot be negative".to_string(),
            ));
        }

        let result = sqlx::query(
            "INSERT INTO products (name, description, category, price, stock, img_url, \
                                   has_discount, discount_percent, discount_ends_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.price)
        .bind(request.stock)
        .bind(&request.img)
        .bind(request.has_discount)
        .bind(request.discount_percent)
        .bind(&request.discount_ends_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update_product(&self, id: i64, request: &SaveProductRequest) -> AppResult<()> {
        if request.stock < 0 {
            return Err(AppError::ValidationError(
                "stock cannot be negative".to_string(),
            ));
        }

        let result = sqlx::query(
            "UPDATE products SET name = ?, description = ?, category = ?, price = ?, \
                                 stock = ?, img_url = ?, has_discount = ?, \
                                 discount_percent = ?, discount_ends_at = ? \
             WHERE id = ?",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.price)
        .bind(request.stock)
        .bind(&request.img)
        .bind(request.has_discount)
        .bind(request.discount_percent)
        .bind(&request.discount_ends_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {id} not found")));
        }

        Ok(())
    }

    /// Delete a catalog row. Existing order lines keep their frozen copy of
    /// the product's name and price.
    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {id} not found")));
        }

        Ok(())
    }
}
