//! HTTP-level tests for the lots module.
//!
//! Each test runs on a fresh in-memory SQLite DB with migrations applied and
//! drives the real routes through `tower::ServiceExt::oneshot`.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{create_test_router, ids, ordered_ids, publish, send};

#[tokio::test]
async fn create_returns_location_and_body() {
    let router = create_test_router().await;

    let resp = send(
        &router,
        Method::POST,
        "/api/lots",
        Some(5),
        Some(common::lot_json("North", 100)),
    )
    .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let id = resp.body["id"].as_i64().unwrap();
    assert_eq!(
        resp.headers.get(header::LOCATION).unwrap(),
        format!("/api/lots/lot/{id}").as_str()
    );
    assert_eq!(resp.body["owner_id"], 5);
    assert_eq!(resp.body["district"], "North");

    let got = send(&router, Method::GET, &format!("/api/lots/lot/{id}"), None, None).await;
    assert_eq!(got.status, StatusCode::OK);
    assert_eq!(got.body["price"], 100);
}

#[tokio::test]
async fn create_requires_caller_identity() {
    let router = create_test_router().await;
    let resp = send(
        &router,
        Method::POST,
        "/api/lots",
        None,
        Some(common::lot_json("North", 100)),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn create_rejects_invalid_lot() {
    let router = create_test_router().await;
    let mut body = common::lot_json("North", 100);
    body["rooms"] = json!(9);

    let resp = send(&router, Method::POST, "/api/lots", Some(1), Some(body)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "VALIDATION");
}

#[tokio::test]
async fn get_unknown_and_malformed_ids() {
    let router = create_test_router().await;

    let missing = send(&router, Method::GET, "/api/lots/lot/999", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["code"], "LOTS_NOT_FOUND");
    assert_eq!(missing.body["instance"], "/api/lots/lot/999");

    let bad = send(&router, Method::GET, "/api/lots/lot/abc", None, None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filter_scenario_north_south() {
    let router = create_test_router().await;
    let north = publish(&router, 1, "North", 100).await;
    let south = publish(&router, 1, "South", 200).await;

    let resp = send(
        &router,
        Method::GET,
        "/api/lots?district=North&price=gte:150",
        None,
        None,
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(ids(&resp.body).is_empty());

    let resp = send(
        &router,
        Method::GET,
        "/api/lots?district=North&district=South",
        None,
        None,
    )
    .await;
    assert_eq!(ids(&resp.body), vec![north, south]);

    let resp = send(&router, Method::GET, "/api/lots?price=lt:150", None, None).await;
    assert_eq!(ids(&resp.body), vec![north]);

    // Bare value and explicit `eq:` are the same filter.
    let bare = send(&router, Method::GET, "/api/lots?price=200", None, None).await;
    let eq = send(&router, Method::GET, "/api/lots?price=eq:200", None, None).await;
    assert_eq!(ids(&bare.body), vec![south]);
    assert_eq!(ids(&eq.body), vec![south]);
}

#[tokio::test]
async fn range_filters_are_inclusive() {
    let router = create_test_router().await;
    let a = publish(&router, 1, "North", 100).await;
    let b = publish(&router, 1, "North", 200).await;
    let _c = publish(&router, 1, "North", 300).await;

    let resp = send(&router, Method::GET, "/api/lots?price=100:200", None, None).await;
    assert_eq!(ids(&resp.body), vec![a, b]);

    let resp = send(
        &router,
        Method::GET,
        "/api/lots?created_at=2000-01-01:2999-12-31",
        None,
        None,
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(ids(&resp.body).len(), 3);
}

#[tokio::test]
async fn unknown_fields_are_ignored() {
    let router = create_test_router().await;
    publish(&router, 1, "North", 100).await;
    publish(&router, 1, "South", 200).await;

    let resp = send(&router, Method::GET, "/api/lots?bogus_field=1", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(ids(&resp.body).len(), 2);
}

#[tokio::test]
async fn sorting_and_sort_errors() {
    let router = create_test_router().await;
    let cheap = publish(&router, 1, "North", 100).await;
    let pricey = publish(&router, 1, "South", 200).await;

    let resp = send(
        &router,
        Method::GET,
        "/api/lots?sort_by=price&sort_order=asc",
        None,
        None,
    )
    .await;
    assert_eq!(ordered_ids(&resp.body), vec![cheap, pricey]);

    let resp = send(&router, Method::GET, "/api/lots?sort_by=price", None, None).await;
    assert_eq!(ordered_ids(&resp.body), vec![pricey, cheap]);

    let resp = send(&router, Method::GET, "/api/lots?sort_order=sideways", None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "INVALID_QUERY");

    let resp = send(&router, Method::GET, "/api/lots?sort_by=street", None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "INVALID_QUERY");
}

#[tokio::test]
async fn invalid_typed_value_is_rejected() {
    let router = create_test_router().await;
    publish(&router, 1, "North", 100).await;

    let resp = send(&router, Method::GET, "/api/lots?price=gte:cheap", None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "INVALID_QUERY");

    let resp = send(&router, Method::GET, "/api/lots?created_at=yesterday", None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_are_owner_scoped() {
    let router = create_test_router().await;
    let id = publish(&router, 1, "North", 100).await;
    let uri = format!("/api/lots/lot/{id}");

    // Another user cannot see the lot as theirs.
    let resp = send(&router, Method::PATCH, &uri, Some(2), Some(json!({"price": 1}))).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    let resp = send(&router, Method::DELETE, &uri, Some(2), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let got = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(got.body["price"], 100);

    // The owner can.
    let resp = send(
        &router,
        Method::PATCH,
        &uri,
        Some(1),
        Some(json!({"price": 150, "rooms": 3})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let got = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(got.body["price"], 150);
    assert_eq!(got.body["rooms"], 3);

    let resp = send(&router, Method::PATCH, &uri, Some(1), Some(json!({"area": 0}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = send(&router, Method::DELETE, &uri, Some(1), None).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = send(&router, Method::DELETE, &uri, Some(1), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lots_by_user() {
    let router = create_test_router().await;
    let a = publish(&router, 1, "North", 100).await;
    let b = publish(&router, 1, "South", 200).await;
    publish(&router, 2, "South", 300).await;

    let resp = send(&router, Method::GET, "/api/lots/user/1", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(ids(&resp.body), vec![a, b]);

    let resp = send(&router, Method::GET, "/api/lots/user/77", None, None).await;
    assert!(ids(&resp.body).is_empty());
}

#[tokio::test]
async fn custom_operator_aliases() {
    use lots::domain::service::{Service, ServiceConfig};
    use lots::infra::storage::{
        fields::lot_field_map, migrations::Migrator, sea_orm_repo::SeaOrmLotsRepository,
    };
    use query_core::{Operator, OperatorRegistry, QueryParams, SortSpecification};
    use sea_orm_migration::MigratorTrait;
    use std::sync::Arc;

    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let service = Arc::new(
        Service::new(
            Arc::new(SeaOrmLotsRepository::new(db)),
            lot_field_map().filter_registry(),
            ServiceConfig::default(),
        )
        .with_operators(OperatorRegistry::standard().with_token("min", Operator::Ge)),
    );
    let router = lots::api::rest::routes::register_routes(axum::Router::new(), service.clone())
        .expect("routes");

    let _cheap = publish(&router, 1, "North", 100).await;
    let dear = publish(&router, 1, "North", 300).await;

    let found = service
        .list_lots(&QueryParams::parse("price=min:200"), SortSpecification::default())
        .await
        .unwrap();
    assert_eq!(found.iter().map(|l| l.id).collect::<Vec<_>>(), vec![dear]);

    let resp = send(&router, Method::GET, "/api/lots?price=min:200", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(ordered_ids(&resp.body), vec![dear]);

    // Without the alias `min` is a range bound that is not an integer.
    let plain = create_test_router().await;
    let resp = send(&plain, Method::GET, "/api/lots?price=min:200", None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "INVALID_QUERY");
}
