use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use streamaware::api::{create_router, AppState};

fn create_test_server() -> TestServer {
    let state = AppState::in_memory();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

async fn seeded_server() -> TestServer {
    let server = create_test_server();
    server.post("/api/v1/catalog/seed").await.assert_status_ok();
    server
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Titles in response order
fn titles(response: &Value) -> Vec<String> {
    response
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}

/// Titles sorted, for collections whose store order is not insertion order
fn sorted_titles(response: &Value) -> Vec<String> {
    let mut titles = titles(response);
    titles.sort();
    titles
}

/// Signs up a fresh account and returns its id token
async fn sign_up(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "username": "movie_fan",
            "email": email,
            "country": "Denmark",
            "password": "secret1"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["session"]["idToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-42");
}

#[tokio::test]
async fn test_seed_and_stats() {
    let server = create_test_server();

    let stats: Value = server.get("/api/v1/catalog/stats").await.json();
    assert_eq!(stats["hasData"], false);

    let seeded: Value = server.post("/api/v1/catalog/seed").await.json();
    assert_eq!(seeded["seeded"], true);
    assert_eq!(seeded["stats"]["moviesCount"], 4);
    assert_eq!(seeded["stats"]["seriesCount"], 5);

    // Second seed leaves the populated catalog alone
    let again: Value = server.post("/api/v1/catalog/seed").await.json();
    assert_eq!(again["seeded"], false);
}

#[tokio::test]
async fn test_list_titles_merges_collections() {
    let server = seeded_server().await;
    let body: Value = server.get("/api/v1/titles").await.json();
    assert_eq!(body.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_search_is_prefix_and_sorted() {
    let server = seeded_server().await;

    let response = server.get("/api/v1/titles/search").add_query_param("q", "the").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(titles(&body), vec!["The Crown", "The Dark Knight"]);

    let body: Value = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "  ")
        .await
        .json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_filter_and_across_facets() {
    let server = seeded_server().await;

    let body: Value = server
        .post("/api/v1/titles/filter")
        .json(&json!({ "platforms": ["netflix"], "contentType": ["Movies"] }))
        .await
        .json();
    assert_eq!(sorted_titles(&body), vec!["Inception", "The Dark Knight"]);

    // No active facet returns the whole catalog
    let body: Value = server.post("/api/v1/titles/filter").json(&json!({})).await.json();
    assert_eq!(body.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_category_views() {
    let server = seeded_server().await;

    let body: Value = server.get("/api/v1/platforms/Viaplay/titles").await.json();
    assert_eq!(sorted_titles(&body), vec!["Druk", "Parasite"]);

    let body: Value = server.get("/api/v1/content-types/Series/titles").await.json();
    assert_eq!(body.as_array().unwrap().len(), 5);

    // Movies come before series
    let body: Value = server.get("/api/v1/genres/Sci-Fi/titles").await.json();
    assert_eq!(titles(&body), vec!["Inception", "Black Mirror"]);

    server
        .get("/api/v1/content-types/Podcasts/titles")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_top_rated() {
    let server = seeded_server().await;
    let body: Value = server
        .get("/api/v1/titles/top-rated")
        .add_query_param("limit", 3)
        .await
        .json();
    assert_eq!(
        titles(&body),
        vec!["The Dark Knight", "Black Mirror", "Inception"]
    );
}

#[tokio::test]
async fn test_create_and_get_title() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/titles")
        .json(&json!({ "title": "Borgen", "seasons": 4, "platforms": ["Netflix"] }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["type"], "series");

    let id = created["id"].as_str().unwrap();
    let body: Value = server.get(&format!("/api/v1/titles/{}", id)).await.json();
    assert_eq!(body["title"], "Borgen");
    assert_eq!(body["seasons"], 4);

    server
        .post("/api/v1/titles")
        .json(&json!({ "year": "2020" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/api/v1/titles/missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_guest_favorites_require_sign_in() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/favorites")
        .add_header(
            HeaderName::from_static("x-post-login-redirect"),
            HeaderValue::from_static("/details?id=7"),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["redirect"], "/details?id=7");
}

#[tokio::test]
async fn test_session_endpoint() {
    let server = create_test_server();

    let guest: Value = server.get("/api/v1/session").await.json();
    assert_eq!(guest["isGuest"], true);
    assert_eq!(guest["userId"], Value::Null);

    let token = sign_up(&server, "fan@example.com").await;
    let user: Value = server
        .get("/api/v1/session")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(user["isGuest"], false);
    assert!(user["userId"].is_string());
}

#[tokio::test]
async fn test_login_returns_redirect_and_logout_ends_session() {
    let server = create_test_server();
    sign_up(&server, "fan@example.com").await;

    server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "fan@example.com", "password": "wrong-pass" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": "Fan@Example.com",
            "password": "secret1",
            "redirect": "/favorites"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["redirect"], "/favorites");
    let token = body["session"]["idToken"].as_str().unwrap().to_string();

    server
        .post("/api/v1/auth/logout")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let session: Value = server
        .get("/api/v1/session")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(session["isGuest"], true);
}

#[tokio::test]
async fn test_sign_up_rejects_invalid_form() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "username": "bad name!",
            "email": "not-an-email",
            "country": "Atlantis",
            "password": "123"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_flow() {
    let server = seeded_server().await;
    let token = sign_up(&server, "fan@example.com").await;

    let catalog: Value = server.get("/api/v1/titles/search").add_query_param("q", "Druk").await.json();
    let druk_id = catalog[0]["id"].as_str().unwrap().to_string();

    let response = server
        .post("/api/v1/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "id": druk_id, "type": "movie" }))
        .await;
    response.assert_status_ok();

    // Adding twice keeps a single entry
    let favorites: Value = server
        .post("/api/v1/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "id": druk_id, "type": "movie" }))
        .await
        .json();
    assert_eq!(favorites.as_array().unwrap().len(), 1);

    let listed: Value = server
        .get("/api/v1/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(listed["favorites"][0]["id"], druk_id.as_str());
    assert_eq!(listed["items"][0]["title"], "Druk");

    let remaining: Value = server
        .delete(&format!("/api/v1/favorites/{}", druk_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert!(remaining.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_lifecycle() {
    let server = create_test_server();
    let token = sign_up(&server, "fan@example.com").await;

    let profile: Value = server
        .get("/api/v1/profile")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(profile["username"], "movie_fan");
    assert_eq!(profile["avatar"], "/images/cat-profile.svg");

    let updated: Value = server
        .patch("/api/v1/profile")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "avatar": "/images/lion-profile.svg" }))
        .await
        .json();
    assert_eq!(updated["avatar"], "/images/lion-profile.svg");
    assert_eq!(updated["country"], "Denmark");

    server
        .patch("/api/v1/profile")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "country": "Atlantis" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .delete("/api/v1/profile")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Account is gone, so the token no longer signs anyone in
    server
        .get("/api/v1/profile")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_options() {
    let server = create_test_server();
    let body: Value = server.get("/api/v1/profile/options").await.json();
    assert_eq!(body["avatars"].as_array().unwrap().len(), 4);
    assert!(body["countries"]
        .as_array()
        .unwrap()
        .contains(&json!("Denmark")));
}
