use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::middlewares::{current_claims, require_admin};
use crate::models::*;
use crate::services::OrderService;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order created", body = OrderCreated),
        (status = 400, description = "Validation or stock error"),
        (status = 503, description = "Transaction timed out, retryable")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let Some(claims) = current_claims(&req) else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "error": { "code": "AUTH_ERROR", "message": "Missing access token" }
        })));
    };

    // The order is always placed for the authenticated user, never for the
    // id the client put in the body.
    let user_id = claims.user_id();
    if request.user_id != user_id {
        log::warn!(
            "Cart user_id {} ignored, placing order for authenticated user {user_id}",
            request.user_id
        );
    }

    match order_service.place_order(user_id, &request).await {
        Ok(created) => Ok(HttpResponse::Created().json(json!({
            "message": "Order created successfully",
            "orderId": created.order_id,
            "trackingNumber": created.tracking_number
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders with buyer contact info", body = [AdminOrderView]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_all_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match order_service.get_all_orders().await {
        Ok(orders) => Ok(HttpResponse::Ok().json(orders)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/orders/user/{user_id}",
    tag = "order",
    params(("user_id" = i64, Path, description = "Owner of the order history")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order history with frozen lines", body = [OrderWithItems]),
        (status = 403, description = "Not the caller's history")
    )
)]
pub async fn get_user_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    // Users read their own history; admins read anyone's.
    match current_claims(&req) {
        Some(claims) if claims.is_admin() || claims.user_id() == user_id => {}
        Some(_) => {
            return Ok(crate::error::AppError::Forbidden.error_response());
        }
        None => {
            return Ok(
                crate::error::AppError::AuthError("Missing access token".to_string())
                    .error_response(),
            );
        }
    }

    match order_service.get_user_orders(user_id).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(orders)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Backward transition rejected"),
        (status = 404, description = "Unknown order")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match order_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Status updated successfully"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/orders/stats",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Delivered totals per month", body = [MonthlySales]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_sales_stats(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match order_service.get_sales_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(stats)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(get_all_orders))
            .route("/stats", web::get().to(get_sales_stats))
            .route("/user/{user_id}", web::get().to(get_user_orders))
            .route("/{id}/status", web::put().to(update_order_status)),
    );
}
