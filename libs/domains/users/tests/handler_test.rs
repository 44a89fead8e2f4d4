//! Handler tests for the Users domain
//!
//! These tests drive the HTTP adapter against in-memory collaborators:
//! - Request deserialization (JSON / query → Rust structs)
//! - Response serialization and status codes
//! - Error body shape for each error kind

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> (Router, InMemoryUserRepository, InMemoryEventPublisher) {
    let repo = InMemoryUserRepository::new();
    let publisher = InMemoryEventPublisher::new();
    let service = UserService::new(
        repo.clone(),
        publisher.clone(),
        SecretHasher::new("TestSecretKey").unwrap(),
    );
    (handlers::router(service), repo, publisher)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, country: &str) -> UserResponse {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            json!({
                "first_name": "firstname",
                "last_name": "lastname",
                "nickname": "nickname",
                "email": "user@test.com",
                "password": "my_test_password",
                "country": country
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    serde_json::from_value(body["user"].clone()).unwrap()
}

#[tokio::test]
async fn test_create_user_returns_201() {
    let (app, repo, publisher) = app();

    let user = create(&app, "EN").await;

    assert!(!user.id.is_empty());
    assert_eq!(user.country, Country::En);
    assert_eq!(user.first_name, "firstname");

    let stored = repo.get(&user.id).await.unwrap();
    assert_ne!(stored.password_hash, "my_test_password");
    assert_eq!(
        publisher.messages().await,
        vec![format!("Created user {}", user.id)]
    );
}

#[tokio::test]
async fn test_create_user_response_has_no_password() {
    let (app, _, _) = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            json!({ "first_name": "a", "password": "secret", "country": "IT" }),
        ))
        .await
        .unwrap();

    let body: Value = json_body(response.into_body()).await;
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_without_country_returns_400() {
    let (app, repo, publisher) = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            json!({ "first_name": "firstname", "password": "p" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"]["type"], "invalid_argument");
    assert_eq!(body["error"]["message"], "Received country is not valid");
    assert!(repo.is_empty().await);
    assert!(publisher.messages().await.is_empty());
}

#[tokio::test]
async fn test_list_users_with_filter_and_paging() {
    let (app, _, _) = app();
    create(&app, "EN").await;
    create(&app, "IT").await;
    create(&app, "EN").await;

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/users?filter_country=EN&page=0&page_size=10",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: UserPage = json_body(response.into_body()).await;
    assert_eq!(page.total_count, 2);
    assert_eq!(page.page, 0);
    assert_eq!(page.page_size, 10);
    assert!(page.results.iter().all(|u| u.country == Country::En));

    let response = app
        .oneshot(empty_request("GET", "/users?page=1&page_size=2"))
        .await
        .unwrap();
    let page: UserPage = json_body(response.into_body()).await;
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_list_users_empty_is_ok() {
    let (app, _, _) = app();

    let response = app.oneshot(empty_request("GET", "/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: UserPage = json_body(response.into_body()).await;
    assert!(page.results.is_empty());
    assert_eq!(page.page_size, 50);
}

#[tokio::test]
async fn test_update_user_returns_204() {
    let (app, repo, _) = app();
    let user = create(&app, "EN").await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}", user.id),
            json!({ "country": "IT", "nickname": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let stored = repo.get(&user.id).await.unwrap();
    assert_eq!(stored.country, Country::It);
    assert_eq!(stored.nickname, "");
    assert_eq!(stored.first_name, "firstname");
}

#[tokio::test]
async fn test_update_user_unknown_country_returns_400() {
    let (app, repo, _) = app();
    let user = create(&app, "EN").await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}", user.id),
            json!({ "country": "UNKNOWN" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.get(&user.id).await.unwrap().country, Country::En);
}

#[tokio::test]
async fn test_update_missing_user_returns_500() {
    let (app, _, _) = app();

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/users/does-not-exist",
            json!({ "nickname": "x" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"]["type"], "internal");
}

#[tokio::test]
async fn test_delete_user_returns_204_then_404() {
    let (app, _, publisher) = app();
    let user = create(&app, "DE").await;
    let uri = format!("/users/{}", user.id);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"]["type"], "not_found");
    assert_eq!(
        body["error"]["message"],
        format!("user {} not found", user.id)
    );

    assert_eq!(publisher.messages().await.len(), 2);
}

#[tokio::test]
async fn test_status_returns_up() {
    let (app, _, _) = app();

    let response = app.oneshot(empty_request("GET", "/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply: StatusReply = json_body(response.into_body()).await;
    assert_eq!(reply.status, models::ServingStatus::Up);
    assert_eq!(reply.message, "Account service up and running");
}
