use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::*;

const CMS_COLUMNS: &str = "id, store_name, store_logo, currency_rate, hero_title, hero_text, \
                           hero_img, hero_bg_img, carousel_title, catalog_title, colors_json, \
                           categories_json, carousel_json";

#[derive(Clone)]
pub struct CmsService {
    pool: SqlitePool,
}

impl CmsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_settings(&self) -> AppResult<Option<CmsSettings>> {
        let settings = sqlx::query_as::<_, CmsSettings>(&format!(
            "SELECT {CMS_COLUMNS} FROM cms_settings WHERE id = 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Update the singleton row. If the row is gone (should not happen after
    /// migrations), recreate it and apply the update once more.
    pub async fn save_settings(&self, request: &SaveCmsRequest) -> AppResult<()> {
        let affected = self.apply_update(request).await?;

        if affected == 0 {
            sqlx::query("INSERT INTO cms_settings (id, store_name) VALUES (1, 'FarmaVida')")
                .execute(&self.pool)
                .await?;
            self.apply_update(request).await?;
        }

        Ok(())
    }

    async fn apply_update(&self, request: &SaveCmsRequest) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE cms_settings SET \
                store_name = ?, store_logo = ?, currency_rate = ?, hero_title = ?, \
                hero_text = ?, hero_img = ?, hero_bg_img = ?, carousel_title = ?, \
                catalog_title = ?, colors_json = ?, categories_json = ?, carousel_json = ? \
             WHERE id = 1",
        )
        .bind(&request.store_name)
        .bind(&request.store_logo)
        .bind(request.currency_rate)
        .bind(&request.hero_title)
        .bind(&request.hero_text)
        .bind(&request.hero_img)
        .bind(&request.hero_bg_img)
        .bind(&request.carousel_title)
        .bind(&request.catalog_title)
        .bind(&request.colors_json)
        .bind(&request.categories_json)
        .bind(&request.carousel_json)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
