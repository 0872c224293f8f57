mod support;

use axum::http::{Method, StatusCode};
use common_auth::Role;
use serde_json::{json, Value};
use support::TestApp;

fn cashier_body(email: &str, password: &str) -> Value {
    json!({
        "username": "till-1",
        "email": email,
        "password": password,
        "name": "Till One",
    })
}

#[tokio::test]
async fn owner_manages_cashier_lifecycle() {
    let app = TestApp::new();
    let owner = app.seed(Role::Owner, "owner@pos.test").await;
    let token = Some(owner.token.as_str());

    let created = app
        .send(
            Method::POST,
            "/api/v1/users/cashier",
            token,
            Some(cashier_body("till@pos.test", "first-pass")),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["role"], "cashier");
    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/users/cashier/{id}");

    let listed = app
        .send(Method::GET, "/api/v1/users/cashier", token, None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["total_items"], 1);
    assert_eq!(listed.body["data"]["data"][0]["id"], id);

    let updated = app
        .send(
            Method::PUT,
            &uri,
            token,
            Some(cashier_body("till@pos.test", "second-pass")),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);

    let login = |password: &'static str| {
        json!({ "email": "till@pos.test", "password": password })
    };
    let old = app
        .send(Method::POST, "/api/v1/auth/login", None, Some(login("first-pass")))
        .await;
    assert_eq!(old.status, StatusCode::BAD_REQUEST);
    let new = app
        .send(Method::POST, "/api/v1/auth/login", None, Some(login("second-pass")))
        .await;
    assert_eq!(new.status, StatusCode::OK);

    let deleted = app.send(Method::DELETE, &uri, token, None).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let fetched = app.send(Method::GET, &uri, token, None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    let after_delete = app
        .send(Method::POST, "/api/v1/auth/login", None, Some(login("second-pass")))
        .await;
    assert_eq!(after_delete.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_records_are_hidden_from_cashier_routes() {
    let app = TestApp::new();
    let owner = app.seed(Role::Owner, "owner@pos.test").await;
    let other_owner = app.seed(Role::Owner, "partner@pos.test").await;
    let token = Some(owner.token.as_str());

    let uri = format!("/api/v1/users/cashier/{}", other_owner.id);
    for method in [Method::GET, Method::DELETE] {
        let reply = app.send(method, &uri, token, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    let reply = app
        .send(Method::GET, "/api/v1/users/cashier/not-a-uuid", token, None)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let listed = app
        .send(Method::GET, "/api/v1/users/cashier", token, None)
        .await;
    assert_eq!(listed.body["data"]["total_items"], 0);
}

#[tokio::test]
async fn cashier_email_must_be_unique() {
    let app = TestApp::new();
    let owner = app.seed(Role::Owner, "owner@pos.test").await;
    let token = Some(owner.token.as_str());

    let reply = app
        .send(
            Method::POST,
            "/api/v1/users/cashier",
            token,
            Some(cashier_body("owner@pos.test", "pw")),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.error_code(), Some("email_exists"));
}
