use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::CmsService;

#[utoipa::path(
    get,
    path = "/api/cms",
    tag = "cms",
    responses((status = 200, description = "Branding settings", body = CmsSettings))
)]
pub async fn get_cms(cms_service: web::Data<CmsService>) -> Result<HttpResponse> {
    match cms_service.get_settings().await {
        Ok(Some(settings)) => Ok(HttpResponse::Ok().json(settings)),
        Ok(None) => Ok(HttpResponse::Ok().json(json!({}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/cms",
    tag = "cms",
    request_body = SaveCmsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Settings saved"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn save_cms(
    cms_service: web::Data<CmsService>,
    req: HttpRequest,
    request: web::Json<SaveCmsRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match cms_service.save_settings(&request).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("CMS updated successfully"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cms_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cms")
            .route("", web::get().to(get_cms))
            .route("", web::put().to(save_cms)),
    );
}
