use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::ProductService;

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "product",
    responses((status = 200, description = "Full catalog", body = [Product]))
)]
pub async fn get_all_products(product_service: web::Data<ProductService>) -> Result<HttpResponse> {
    match product_service.get_all_products().await {
        Ok(products) => Ok(HttpResponse::Ok().json(products)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail", body = Product),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn get_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match product_service.get_product(path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(product)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "product",
    request_body = SaveProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    request: web::Json<SaveProductRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match product_service.create_product(&request).await {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "id": id,
            "message": "Product created"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    request_body = SaveProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn update_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SaveProductRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match product_service
        .update_product(path.into_inner(), &request)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Product updated"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn delete_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match product_service.delete_product(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Product deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(get_all_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
