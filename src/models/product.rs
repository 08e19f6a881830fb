use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub img_url: Option<String>,
    pub has_discount: bool,
    pub discount_percent: f64,
    pub discount_ends_at: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub img: Option<String>,
    #[serde(default)]
    pub has_discount: bool,
    #[serde(default)]
    pub discount_percent: f64,
    pub discount_ends_at: Option<String>,
}
