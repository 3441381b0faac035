#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use lots::api::rest::routes;
use lots::domain::service::{Service, ServiceConfig};
use lots::infra::storage::{
    fields::lot_field_map, migrations::Migrator, sea_orm_repo::SeaOrmLotsRepository,
};

/// Fresh in-memory SQLite DB with migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_service_with(config: ServiceConfig) -> Arc<Service> {
    let db = create_test_db().await;
    let repo = SeaOrmLotsRepository::new(db);
    Arc::new(Service::new(
        Arc::new(repo),
        lot_field_map().filter_registry(),
        config,
    ))
}

pub async fn create_test_service() -> Arc<Service> {
    create_test_service_with(ServiceConfig::default()).await
}

pub async fn create_test_router() -> Router {
    let service = create_test_service().await;
    routes::register_routes(Router::new(), service).expect("routes")
}

pub fn lot_json(district: &str, price: i64) -> Value {
    serde_json::json!({
        "estate_type": "apartment",
        "rooms": 2,
        "area": 48,
        "floor": 4,
        "max_floor": 9,
        "city": "Riga",
        "district": district,
        "street": "Elizabetes",
        "building": "21a",
        "price": price,
    })
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// One request through the router. `caller` becomes the `x-user-id` header.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    caller: Option<i64>,
    body: Option<Value>,
) -> TestResponse {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(id) = caller {
        req = req.header("x-user-id", id.to_string());
    }
    let req = match body {
        Some(v) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Publishes a lot as `owner` and returns its id.
pub async fn publish(router: &Router, owner: i64, district: &str, price: i64) -> i64 {
    let resp = send(
        router,
        Method::POST,
        "/api/lots",
        Some(owner),
        Some(lot_json(district, price)),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "body: {}", resp.body);
    resp.body["id"].as_i64().expect("id in body")
}

/// Ids in response order.
pub fn ordered_ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}

/// Ids sorted ascending, for set comparisons.
pub fn ids(body: &Value) -> Vec<i64> {
    let mut ids = ordered_ids(body);
    ids.sort_unstable();
    ids
}
