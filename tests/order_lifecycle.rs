mod common;

use chrono::Utc;
use common::*;
use farmavida_backend::error::AppError;
use farmavida_backend::models::OrderStatus;

#[tokio::test]
async fn status_moves_forward_only() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Gauze", 2.0, 10).await;

    let created = service
        .place_order(user_id, &cart(user_id, &[(product_id, 1, 2.0)]))
        .await
        .unwrap();

    service
        .update_status(created.order_id, OrderStatus::Shipped)
        .await
        .unwrap();
    service
        .update_status(created.order_id, OrderStatus::Delivered)
        .await
        .unwrap();

    // Re-setting the current status is a no-op, moving backward is not.
    service
        .update_status(created.order_id, OrderStatus::Delivered)
        .await
        .unwrap();

    let err = service
        .update_status(created.order_id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let status: String = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(created.order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "Delivered");
}

#[tokio::test]
async fn unknown_order_status_update_is_not_found() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let err = service
        .update_status(4242, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn sales_stats_only_count_delivered_orders() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Thermometer", 10.0, 100).await;

    let delivered_a = service
        .place_order(user_id, &cart(user_id, &[(product_id, 5, 10.0)]))
        .await
        .unwrap();
    let delivered_b = service
        .place_order(user_id, &cart(user_id, &[(product_id, 3, 10.0)]))
        .await
        .unwrap();
    // This one stays Pending and must not show up in the report.
    service
        .place_order(user_id, &cart(user_id, &[(product_id, 7, 10.0)]))
        .await
        .unwrap();

    for order_id in [delivered_a.order_id, delivered_b.order_id] {
        service
            .update_status(order_id, OrderStatus::Delivered)
            .await
            .unwrap();
    }

    let stats = service.get_sales_stats().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].month, Utc::now().format("%Y-%m").to_string());
    assert_eq!(stats[0].total, 80.0);
}

#[tokio::test]
async fn admin_listing_joins_buyer_contact_info() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Face masks", 0.5, 200).await;

    service
        .place_order(user_id, &cart(user_id, &[(product_id, 10, 0.5)]))
        .await
        .unwrap();

    let orders = service.get_all_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.user_name, "Ana");
    assert_eq!(orders[0].order.user_email, "ana@example.com");
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].name, "Face masks");
}
