mod common;

use std::collections::HashSet;

use common::*;
use farmavida_backend::error::AppError;

#[tokio::test]
async fn successful_order_freezes_snapshots_and_decrements_stock() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    set_currency_rate(&pool, 36.5).await;
    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Paracetamol 500mg", 10.0, 5).await;

    let created = service
        .place_order(user_id, &cart(user_id, &[(product_id, 5, 10.0)]))
        .await
        .expect("order should succeed");

    assert_eq!(created.tracking_number.len(), 8);
    assert!(created.tracking_number.chars().all(|c| c.is_ascii_digit()));

    assert_eq!(stock_of(&pool, product_id).await, 0);

    let (total, rate): (f64, f64) = sqlx::query_as(
        "SELECT total, exchange_rate_snapshot FROM orders WHERE id = ?",
    )
    .bind(created.order_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(total, 50.0);
    assert_eq!(rate, 36.5);

    let status: String = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(created.order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "Pending");
}

#[tokio::test]
async fn missing_currency_rate_defaults_to_zero() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    // Drop the singleton so the snapshot read comes back empty.
    sqlx::query("DELETE FROM cms_settings").execute(&pool).await.unwrap();

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Ibuprofen 400mg", 4.0, 2).await;

    let created = service
        .place_order(user_id, &cart(user_id, &[(product_id, 1, 4.0)]))
        .await
        .unwrap();

    let rate: f64 =
        sqlx::query_scalar("SELECT exchange_rate_snapshot FROM orders WHERE id = ?")
            .bind(created.order_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rate, 0.0);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Luis", "luis@example.com").await;
    let cheap = seed_product(&pool, "Vitamin C", 3.0, 50).await;
    let scarce = seed_product(&pool, "Amoxicillin 250mg", 8.0, 3).await;

    let request = cart(user_id, &[(cheap, 2, 3.0), (scarce, 5, 8.0)]);
    let err = service.place_order(user_id, &request).await.unwrap_err();

    match err {
        AppError::InsufficientStock {
            product_name,
            available,
            requested,
        } => {
            assert_eq!(product_name, "Amoxicillin 250mg");
            assert_eq!(available, 3);
            assert_eq!(requested, 5);
        }
        other => panic!("expected stock error, got {other:?}"),
    }

    // Full rollback: nothing written, nothing decremented.
    assert_eq!(stock_of(&pool, cheap).await, 50);
    assert_eq!(stock_of(&pool, scarce).await, 3);
    assert_eq!(order_count(&pool).await, 0);
    assert_eq!(line_count(&pool).await, 0);
}

#[tokio::test]
async fn failing_cart_is_idempotent() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Luis", "luis@example.com").await;
    let product_id = seed_product(&pool, "Insulin pen", 25.0, 1).await;

    let request = cart(user_id, &[(product_id, 4, 25.0)]);

    for _ in 0..2 {
        let err = service.place_order(user_id, &request).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 1,
                requested: 4,
                ..
            }
        ));
    }

    assert_eq!(stock_of(&pool, product_id).await, 1);
    assert_eq!(order_count(&pool).await, 0);
}

#[tokio::test]
async fn unknown_product_aborts_order() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Eva", "eva@example.com").await;
    let known = seed_product(&pool, "Saline spray", 2.5, 10).await;

    let request = cart(user_id, &[(known, 1, 2.5), (9999, 1, 1.0)]);
    let err = service.place_order(user_id, &request).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(stock_of(&pool, known).await, 10);
    assert_eq!(order_count(&pool).await, 0);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Eva", "eva@example.com").await;
    let err = service
        .place_order(user_id, &cart(user_id, &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn depleted_product_reports_zero_available() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Paracetamol 500mg", 10.0, 5).await;

    service
        .place_order(user_id, &cart(user_id, &[(product_id, 5, 10.0)]))
        .await
        .expect("first order should deplete the stock");
    assert_eq!(stock_of(&pool, product_id).await, 0);

    let err = service
        .place_order(user_id, &cart(user_id, &[(product_id, 5, 10.0)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 0,
            requested: 5,
            ..
        }
    ));
    assert_eq!(stock_of(&pool, product_id).await, 0);
}

#[tokio::test]
async fn order_totals_survive_catalog_price_changes() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Omeprazole 20mg", 12.0, 30).await;

    let created = service
        .place_order(user_id, &cart(user_id, &[(product_id, 2, 12.0)]))
        .await
        .unwrap();

    sqlx::query("UPDATE products SET price = 999.0 WHERE id = ?")
        .bind(product_id)
        .execute(&pool)
        .await
        .unwrap();

    let orders = service.get_user_orders(user_id).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.total, 24.0);
    assert_eq!(orders[0].items[0].price, 12.0);

    let frozen_total: f64 = sqlx::query_scalar("SELECT total FROM orders WHERE id = ?")
        .bind(created.order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(frozen_total, 24.0);
}

#[tokio::test]
async fn order_lines_survive_product_deletion() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Cough syrup 120ml", 6.5, 8).await;

    service
        .place_order(user_id, &cart(user_id, &[(product_id, 3, 6.5)]))
        .await
        .unwrap();

    sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(product_id)
        .execute(&pool)
        .await
        .unwrap();

    let orders = service.get_user_orders(user_id).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].name, "Cough syrup 120ml");
    assert_eq!(orders[0].items[0].price, 6.5);
    assert_eq!(orders[0].items[0].quantity, 3);
}

#[tokio::test]
async fn concurrent_orders_cannot_oversell() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Test strips", 15.0, 5).await;

    let request_a = cart(user_id, &[(product_id, 5, 15.0)]);
    let request_b = cart(user_id, &[(product_id, 5, 15.0)]);

    let (a, b) = tokio::join!(
        service.place_order(user_id, &request_a),
        service.place_order(user_id, &request_b),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|&&ok| ok).count();
    assert_eq!(successes, 1, "exactly one of two competing orders may win");

    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser.unwrap_err(),
        AppError::InsufficientStock { .. } | AppError::StockConstraint(_)
    ));

    // Never negative, and exactly one decrement happened.
    assert_eq!(stock_of(&pool, product_id).await, 0);
    assert_eq!(order_count(&pool).await, 1);
}

#[tokio::test]
async fn tracking_numbers_are_unique_across_orders() {
    let pool = setup_pool().await;
    let service = order_service(&pool);

    let user_id = seed_user(&pool, "Ana", "ana@example.com").await;
    let product_id = seed_product(&pool, "Bandages", 1.0, 100).await;

    let mut seen = HashSet::new();
    for _ in 0..10 {
        let created = service
            .place_order(user_id, &cart(user_id, &[(product_id, 1, 1.0)]))
            .await
            .unwrap();
        assert_eq!(created.tracking_number.len(), 8);
        assert!(
            seen.insert(created.tracking_number.clone()),
            "duplicate tracking number {}",
            created.tracking_number
        );
    }

    assert_eq!(seen.len(), 10);
    assert_eq!(stock_of(&pool, product_id).await, 90);
}
