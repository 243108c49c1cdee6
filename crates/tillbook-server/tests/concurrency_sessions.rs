mod common;

use axum::http::StatusCode;
use common::setup_app;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_for_both_entities() {
    let app = setup_app();

    let product = json!({
        "name": "Spark Plug",
        "type": "spare part",
        "buying_price": 2.0,
        "selling_price": 4.5
    });
    let service = json!({
        "name": "Tyre Rotation",
        "description": "Rotate all four tyres",
        "price": 19.0
    });

    let ((product_status, _), (service_status, _)) = tokio::join!(
        app.post_json("/products/", product.clone()),
        app.post_json("/services/", service.clone()),
    );
    assert_eq!(product_status, StatusCode::OK);
    assert_eq!(service_status, StatusCode::OK);

    let (_, products) = app.get_json("/products/?limit=1000").await;
    let (_, services) = app.get_json("/services/?limit=1000").await;
    assert!(products.as_array().unwrap().contains(&product));
    assert!(services.as_array().unwrap().contains(&service));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_product_creates_all_persist() {
    let app = setup_app();

    let mut handles = Vec::new();
    for i in 0..16 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            use tower::ServiceExt;
            let body = json!({
                "name": format!("part-{i}"),
                "type": "spare part",
                "buying_price": 1.0,
                "selling_price": 2.0
            });
            let request = axum::http::Request::builder()
                .uri("/products/")
                .method("POST")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(body.to_string()))
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let (_, listed) = app.get_json("/products/?limit=1000").await;
    assert_eq!(listed.as_array().unwrap().len(), 16);
    assert_eq!(app.count_rows("products"), 16);

    // Every session went back to the pool.
    assert_eq!(app.pool.state().idle_connections, app.pool.max_size());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_memory_database_serves_concurrent_sessions() {
    use tillbook_db::{create_pool, ensure_schema, DbRuntimeSettings};

    let pool = create_pool(":memory:", DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        ensure_schema(&conn).unwrap();
    }
    let router = tillbook_server::app(tillbook_server::AppState { pool: pool.clone() });

    let send = |uri: &'static str, body: Option<serde_json::Value>| {
        use tower::ServiceExt;
        let router = router.clone();
        async move {
            let request = match body {
                Some(body) => axum::http::Request::builder()
                    .uri(uri)
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .unwrap(),
                None => axum::http::Request::builder()
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            };
            let response = router.oneshot(request).await.unwrap();
            let status = response.status();
            (status, common::body_json(response).await)
        }
    };

    let product = json!({
        "name": "Fuse",
        "type": "electrical",
        "buying_price": 0.5,
        "selling_price": 1.5
    });
    let service = json!({
        "name": "Oil Change",
        "description": "Basic oil change",
        "price": 29.99
    });

    let ((product_status, _), (service_status, _), (list_status, _)) = tokio::join!(
        send("/products/", Some(product.clone())),
        send("/services/", Some(service.clone())),
        send("/products/", None),
    );
    assert_eq!(product_status, StatusCode::OK);
    assert_eq!(service_status, StatusCode::OK);
    assert_eq!(list_status, StatusCode::OK);

    let (status, products) = send("/products/?limit=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products, json!([product]));

    let (status, services) = send("/services/?limit=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(services, json!([service]));

    assert_eq!(pool.max_size(), 1);
}
