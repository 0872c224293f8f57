mod support;

use axum::http::{Method, StatusCode};
use common_auth::Role;
use serde_json::{json, Value};
use support::TestApp;
use uuid::Uuid;

fn order(customer: &str, total: f64) -> Value {
    json!({ "customer_name": customer, "total_amount": total, "status": "pending" })
}

#[tokio::test]
async fn cashier_creates_order_stamped_with_its_identity() {
    let app = TestApp::new();
    let cashier = app.seed(Role::Cashier, "till@pos.test").await;

    let mut body = order("Walk-in", 19.5);
    body["created_by"] = json!(Uuid::new_v4());
    let reply = app
        .send(Method::POST, "/api/v1/sale-orders", Some(&cashier.token), Some(body))
        .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["message"], "created successfully");
    let data = &reply.body["data"];
    assert_eq!(data["created_by"], cashier.id.to_string());
    assert_eq!(data["total_amount"], 19.5);
    assert!(data["order_number"].as_str().unwrap().starts_with("SO-"));
}

#[tokio::test]
async fn full_lifecycle_as_owner() {
    let app = TestApp::new();
    let owner = app.seed(Role::Owner, "owner@pos.test").await;
    let token = Some(owner.token.as_str());

    let created = app
        .send(Method::POST, "/api/v1/sale-orders", token, Some(order("Walk-in", 10.0)))
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/sale-orders/{id}");

    let fetched = app.send(Method::GET, &uri, token, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["customer_name"], "Walk-in");

    let updated = app
        .send(
            Method::PUT,
            &uri,
            token,
            Some(json!({ "customer_name": "Regular", "total_amount": 12.0, "status": "paid" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["message"], "updated successfully");
    assert_eq!(updated.body["data"]["status"], "paid");

    let deleted = app.send(Method::DELETE, &uri, token, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "deleted successfully");

    let gone = app.send(Method::GET, &uri, token, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "data not found");
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = TestApp::new();
    let owner = app.seed(Role::Owner, "owner@pos.test").await;

    let reply = app
        .send(Method::GET, "/api/v1/sale-orders/not-a-uuid", Some(&owner.token), None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let missing = format!("/api/v1/sale-orders/{}", Uuid::new_v4());
    let reply = app.send(Method::DELETE, &missing, Some(&owner.token), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_paginated_with_defaults() {
    let app = TestApp::new();
    let cashier = app.seed(Role::Cashier, "till@pos.test").await;
    let token = Some(cashier.token.as_str());

    for i in 0..12 {
        let reply = app
            .send(
                Method::POST,
                "/api/v1/sale-orders",
                token,
                Some(order(&format!("Customer {i}"), f64::from(i))),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    let first = app.send(Method::GET, "/api/v1/sale-orders", token, None).await;
    let page = &first.body["data"];
    assert_eq!(page["limit"], 10);
    assert_eq!(page["page"], 1);
    assert_eq!(page["total_items"], 12);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 10);

    let second = app
        .send(Method::GET, "/api/v1/sale-orders?limit=5&page=3", token, None)
        .await;
    assert_eq!(second.body["data"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(second.body["data"]["total_pages"], 3);

    let junk = app
        .send(Method::GET, "/api/v1/sale-orders?limit=abc&page=-1", token, None)
        .await;
    assert_eq!(junk.status, StatusCode::OK);
    assert_eq!(junk.body["data"]["limit"], 10);
    assert_eq!(junk.body["data"]["page"], 1);
}

#[tokio::test]
async fn invalid_payload_is_rejected() {
    let app = TestApp::new();
    let cashier = app.seed(Role::Cashier, "till@pos.test").await;

    let reply = app
        .send(
            Method::POST,
            "/api/v1/sale-orders",
            Some(&cashier.token),
            Some(json!({ "customer_name": "Walk-in", "status": "pending" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .send(
            Method::POST,
            "/api/v1/sale-orders",
            Some(&cashier.token),
            Some(order("Walk-in", -3.0)),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_paging_values_are_clamped() {
    let app = TestApp::new();
    let cashier = app.seed(Role::Cashier, "till@pos.test").await;
    let token = Some(cashier.token.as_str());

    for i in 0..3 {
        app.send(
            Method::POST,
            "/api/v1/sale-orders",
            token,
            Some(order(&format!("Customer {i}"), 1.0)),
        )
        .await;
    }

    let max = i64::MAX;
    let reply = app
        .send(Method::GET, &format!("/api/v1/sale-orders?limit={max}"), token, None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["limit"], 100);
    assert_eq!(reply.body["data"]["total_pages"], 1);
    assert_eq!(reply.body["data"]["data"].as_array().unwrap().len(), 3);

    let reply = app
        .send(
            Method::GET,
            &format!("/api/v1/sale-orders?limit={max}&page={max}"),
            token,
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["page"], max);
    assert!(reply.body["data"]["data"].as_array().unwrap().is_empty());
}
