mod common;

use axum::http::StatusCode;
use common::{ada, body_json, build_test_app, delete, get, get_auth, grace, post_json, put_json};
use serde_json::{json, Value};

fn widget() -> Value {
    json!({
        "name": "Widget",
        "description": "A very useful widget",
        "price": "9.99",
        "quantity": 2
    })
}

fn png_image() -> Value {
    json!({
        "fileName": "widget.png",
        "fileBytes": "iVBORw0KGgo=",
        "contentType": "image/png",
        "description": "Front view",
        "length": 8,
        "name": "front"
    })
}

async fn create_widget(app: &common::TestApp, token: &str) -> String {
    let response = post_json(app.router.clone(), "/api/v1/cart-items", token, widget()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_returns_201_with_stored_item() {
    let app = build_test_app();
    let token = app.token_for(&ada());

    let response = post_json(app.router.clone(), "/api/v1/cart-items", &token, widget()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Widget");
    assert_eq!(json["data"]["price"], "9.99");
    assert_eq!(json["data"]["quantity"], 2);
    assert_ne!(json["data"]["id"], "00000000-0000-0000-0000-000000000000");

    // The caller was provisioned on first sight and owns the row.
    let users = app.store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].auth_provider_id, "1001");
    assert_eq!(app.store.cart_items()[0].user_id, users[0].id);
}

#[tokio::test]
async fn get_update_delete_round_trip() {
    let app = build_test_app();
    let token = app.token_for(&ada());
    let id = create_widget(&app, &token).await;
    let uri = format!("/api/v1/cart-items/{id}");

    let response = get_auth(app.router.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], id.as_str());

    let response = put_json(
        app.router.clone(),
        &uri,
        &token,
        json!({ "name": "Gadget", "price": "4.50", "quantity": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Gadget");
    assert_eq!(json["data"]["quantity"], 5);

    let response = delete(app.router.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], true);

    let response = get_auth(app.router, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payload_returns_every_violation() {
    let app = build_test_app();
    let token = app.token_for(&ada());

    let response = post_json(
        app.router,
        "/api/v1/cart-items",
        &token,
        json!({ "name": " ", "price": "0", "quantity": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["errors"],
        json!([
            "Price must be greater than 0.",
            "Name is required.",
            "Quantity must be greater than 0."
        ])
    );
    assert_eq!(
        json["error"],
        "Price must be greater than 0.,Name is required.,Quantity must be greater than 0."
    );
    assert!(app.store.cart_items().is_empty());
}

#[tokio::test]
async fn price_outside_column_range_is_rejected() {
    let app = build_test_app();
    let token = app.token_for(&ada());

    for (price, message) in [
        ("0.001", "Price must not have more than 2 decimal places."),
        ("100000000000000000", "Price must not exceed 9999999999999999.99."),
    ] {
        let mut body = widget();
        body["price"] = json!(price);

        let response = post_json(app.router.clone(), "/api/v1/cart-items", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{price}");
        assert_eq!(body_json(response).await["errors"], json!([message]));
    }
    assert!(app.store.cart_items().is_empty());
}

#[tokio::test]
async fn other_users_items_are_not_found() {
    let app = build_test_app();
    let ada_token = app.token_for(&ada());
    let grace_token = app.token_for(&grace());
    let id = create_widget(&app, &ada_token).await;
    let uri = format!("/api/v1/cart-items/{id}");

    let response = get_auth(app.router.clone(), &uri, &grace_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = put_json(app.router.clone(), &uri, &grace_token, widget()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app.router.clone(), &uri, &grace_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        app.router.clone(),
        &format!("{uri}/images"),
        &grace_token,
        png_image(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Still there for the owner.
    let response = get_auth(app.router, &uri, &ada_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_pages_callers_items_only() {
    let app = build_test_app();
    let ada_token = app.token_for(&ada());
    let grace_token = app.token_for(&grace());
    for _ in 0..3 {
        create_widget(&app, &ada_token).await;
    }
    create_widget(&app, &grace_token).await;

    let response = get_auth(
        app.router,
        "/api/v1/cart-items?page=2&pageSize=2",
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["page"], 2);
    assert_eq!(json["pageSize"], 2);
    assert_eq!(json["totalCount"], 3);
    assert_eq!(json["totalPages"], 2);
}

#[tokio::test]
async fn list_defaults_to_first_page() {
    let app = build_test_app();
    let token = app.token_for(&ada());

    let response = get_auth(app.router, "/api/v1/cart-items", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
    assert_eq!(json["page"], 1);
    assert_eq!(json["pageSize"], 25);
    assert_eq!(json["totalCount"], 0);
}

#[tokio::test]
async fn list_without_token_is_user_not_found() {
    let app = build_test_app();

    let response = get(app.router, "/api/v1/cart-items").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn create_without_token_is_invalid_argument() {
    let app = build_test_app();

    let response = post_json(app.router, "/api/v1/cart-items", "not-a-jwt", widget()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ARGUMENT");
    assert!(app.store.cart_items().is_empty());
}

#[tokio::test]
async fn nil_id_is_invalid_argument() {
    let app = build_test_app();
    let token = app.token_for(&ada());

    let response = get_auth(
        app.router,
        "/api/v1/cart-items/00000000-0000-0000-0000-000000000000",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn malformed_id_is_rejected() {
    let app = build_test_app();
    let token = app.token_for(&ada());

    let response = get_auth(app.router, "/api/v1/cart-items/not-a-uuid", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_attach_returns_201_and_base64_bytes() {
    let app = build_test_app();
    let token = app.token_for(&ada());
    let id = create_widget(&app, &token).await;

    let response = post_json(
        app.router,
        &format!("/api/v1/cart-items/{id}/images"),
        &token,
        png_image(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["fileName"], "widget.png");
    assert_eq!(json["data"]["fileBytes"], "iVBORw0KGgo=");
    assert_eq!(json["data"]["contentType"], "image/png");

    let images = app.store.images();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].file_bytes.len(), 8);
}

#[tokio::test]
async fn unsupported_image_type_is_rejected() {
    let app = build_test_app();
    let token = app.token_for(&ada());
    let id = create_widget(&app, &token).await;

    let mut body = png_image();
    body["contentType"] = json!("image/webp");

    let response = post_json(
        app.router,
        &format!("/api/v1/cart-items/{id}/images"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["errors"],
        json!(["Invalid image content type. Supported types are JPEG, PNG, and GIF."])
    );
    assert!(app.store.images().is_empty());
}

#[tokio::test]
async fn store_outage_during_sign_in_leaves_caller_anonymous() {
    let app = build_test_app();
    let token = app.token_for(&ada());
    let id = create_widget(&app, &token).await;
    app.store.set_unavailable(true);

    let response = get_auth(app.router, &format!("/api/v1/cart-items/{id}"), &token).await;

    // The user lookup in the extractor fails open, so the service sees a
    // blank id.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn rejected_write_is_persistence_failure() {
    let app = build_test_app();
    let token = app.token_for(&ada());
    // Provision the caller before writes start failing.
    get_auth(app.router.clone(), "/api/v1/cart-items", &token).await;
    app.store.set_reject_writes(true);

    let response = post_json(app.router, "/api/v1/cart-items", &token, widget()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_FAILED");
    assert_eq!(json["errors"], json!(["Failed to add cart item."]));
}
