use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Singleton branding/theming record (row id 1). `currency_rate` doubles as
/// the exchange-rate source snapshotted onto new orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CmsSettings {
    pub id: i64,
    pub store_name: Option<String>,
    pub store_logo: Option<String>,
    pub currency_rate: f64,
    pub hero_title: Option<String>,
    pub hero_text: Option<String>,
    pub hero_img: Option<String>,
    pub hero_bg_img: Option<String>,
    pub carousel_title: Option<String>,
    pub catalog_title: Option<String>,
    pub colors_json: Option<String>,
    pub categories_json: Option<String>,
    pub carousel_json: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveCmsRequest {
    pub store_name: Option<String>,
    pub store_logo: Option<String>,
    #[serde(default)]
    pub currency_rate: f64,
    pub hero_title: Option<String>,
    pub hero_text: Option<String>,
    pub hero_img: Option<String>,
    pub hero_bg_img: Option<String>,
    pub carousel_title: Option<String>,
    pub catalog_title: Option<String>,
    pub colors_json: Option<String>,
    pub categories_json: Option<String>,
    pub carousel_json: Option<String>,
}
