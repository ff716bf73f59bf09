mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use short_url::infrastructure::memory::{InMemoryUrlRepository, InMemoryUserRepository};

use common::{bearer, create_test_server, create_url, id_of, list_urls, register_user};

// ─── POST /urls ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_anonymous() {
    let server = create_test_server();

    let response = server
        .post("/urls")
        .json(&json!({ "originalUrl": "https://example.com/a/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    let code = body["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(body["originalUrl"], "https://example.com/a/long/path");
    assert_eq!(body["shortUrl"], format!("{}/{}", common::BASE_URL, code));
}

#[tokio::test]
async fn test_create_owned_shows_in_list() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;

    let created = create_url(&server, "https://example.com", Some(&token)).await;

    let listed = list_urls(&server, &token).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["shortCode"], created["shortCode"]);
    assert_eq!(listed[0]["clickCount"], 0);
}

#[tokio::test]
async fn test_create_with_invalid_token_is_anonymous() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;

    server
        .post("/urls")
        .add_header("Authorization", bearer("garbage.token.value"))
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    assert!(list_urls(&server, &token).await.is_empty());
}

#[tokio::test]
async fn test_create_missing_original_url() {
    let server = create_test_server();

    let response = server.post("/urls").json(&json!({})).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_rejects_non_http_url() {
    let server = create_test_server();

    for bad in ["not a url", "ftp://example.com", "javascript:alert(1)", ""] {
        server
            .post("/urls")
            .json(&json!({ "originalUrl": bad }))
            .await
            .assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_create_rejects_url_unusable_as_redirect_target() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;

    for bad in [
        "https://example.com/a\nb",
        "https://example.com/a\r\nSet-Cookie: x=1",
        "https://example.com/\tpath",
        " https://example.com",
    ] {
        let response = server
            .post("/urls")
            .add_header("Authorization", bearer(&token))
            .json(&json!({ "originalUrl": bad }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "validation_error");
    }

    assert!(list_urls(&server, &token).await.is_empty());
}

#[tokio::test]
async fn test_create_collision_is_retried() {
    let state = common::create_test_state_with(
        Arc::new(InMemoryUrlRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(common::ScriptedCodeGenerator::new(&[
            "aaaaaa", "aaaaaa", "bbbbbb",
        ])),
    );
    let server = common::server_for(state);

    let first = create_url(&server, "https://one.example", None).await;
    let second = create_url(&server, "https://two.example", None).await;

    assert_eq!(first["shortCode"], "aaaaaa");
    assert_eq!(second["shortCode"], "bbbbbb");
}

#[tokio::test]
async fn test_create_collision_exhaustion_is_internal_error() {
    let state = common::create_test_state_with(
        Arc::new(InMemoryUrlRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(common::ScriptedCodeGenerator::new(&["aaaaaa"; 6])),
    );
    let server = common::server_for(state);

    create_url(&server, "https://one.example", None).await;

    let response = server
        .post("/urls")
        .json(&json!({ "originalUrl": "https://two.example" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Failed to create short URL");
}

// ─── GET /urls ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_requires_token() {
    let server = create_test_server();

    let response = server.get("/urls").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn test_list_rejects_invalid_token() {
    let server = create_test_server();

    server
        .get("/urls")
        .add_header("Authorization", bearer("not-a-jwt"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_newest_first_and_owner_scoped() {
    let server = create_test_server();
    let (ana, _) = register_user(&server, "ana@example.com").await;
    let (bo, _) = register_user(&server, "bo@example.com").await;

    let first = create_url(&server, "https://first.example", Some(&ana)).await;
    let second = create_url(&server, "https://second.example", Some(&ana)).await;
    create_url(&server, "https://bo.example", Some(&bo)).await;
    create_url(&server, "https://anon.example", None).await;

    let listed = list_urls(&server, &ana).await;

    let codes: Vec<&Value> = listed.iter().map(|u| &u["shortCode"]).collect();
    assert_eq!(codes, vec![&second["shortCode"], &first["shortCode"]]);
    for url in &listed {
        assert!(url.get("id").is_some());
        assert!(url.get("createdAt").is_some());
        assert!(url.get("updatedAt").is_some());
    }
}

// ─── PUT /urls/{id} ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_success_keeps_code() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;
    let created = create_url(&server, "https://old.example", Some(&token)).await;
    let code = created["shortCode"].as_str().unwrap();
    let id = id_of(&server, &token, code).await;

    let response = server
        .put(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "originalUrl": "https://new.example" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["originalUrl"], "https://new.example");
    assert_eq!(body["shortCode"], code);
    assert_eq!(body["shortUrl"], created["shortUrl"]);

    let redirect = server.get(&format!("/{code}")).await;
    assert_eq!(redirect.header("location"), "https://new.example");
}

#[tokio::test]
async fn test_update_foreign_url_is_not_found() {
    let server = create_test_server();
    let (ana, _) = register_user(&server, "ana@example.com").await;
    let (bo, _) = register_user(&server, "bo@example.com").await;
    let created = create_url(&server, "https://ana.example", Some(&ana)).await;
    let id = id_of(&server, &ana, created["shortCode"].as_str().unwrap()).await;

    server
        .put(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&bo))
        .json(&json!({ "originalUrl": "https://evil.example" }))
        .await
        .assert_status_not_found();

    let listed = list_urls(&server, &ana).await;
    assert_eq!(listed[0]["originalUrl"], "https://ana.example");
}

#[tokio::test]
async fn test_update_validates_body() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;
    let created = create_url(&server, "https://ana.example", Some(&token)).await;
    let id = id_of(&server, &token, created["shortCode"].as_str().unwrap()).await;

    server
        .put(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "originalUrl": "nope" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_update_rejects_control_characters() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;
    let created = create_url(&server, "https://ana.example", Some(&token)).await;
    let code = created["shortCode"].as_str().unwrap();
    let id = id_of(&server, &token, code).await;

    server
        .put(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "originalUrl": "https://new.example/a\nb" }))
        .await
        .assert_status_bad_request();

    let redirect = server.get(&format!("/{code}")).await;
    redirect.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(redirect.header("location"), "https://ana.example");
}

#[tokio::test]
async fn test_update_unknown_id() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;

    server
        .put("/urls/999")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "originalUrl": "https://new.example" }))
        .await
        .assert_status_not_found();
}

// ─── DELETE /urls/{id} ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_then_delete_again() {
    let server = create_test_server();
    let (token, _) = register_user(&server, "ana@example.com").await;
    let created = create_url(&server, "https://ana.example", Some(&token)).await;
    let id = id_of(&server, &token, created["shortCode"].as_str().unwrap()).await;

    server
        .delete(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_not_found();

    assert!(list_urls(&server, &token).await.is_empty());
}

#[tokio::test]
async fn test_delete_foreign_url_is_not_found() {
    let server = create_test_server();
    let (ana, _) = register_user(&server, "ana@example.com").await;
    let (bo, _) = register_user(&server, "bo@example.com").await;
    let created = create_url(&server, "https://ana.example", Some(&ana)).await;
    let code = created["shortCode"].as_str().unwrap();
    let id = id_of(&server, &ana, code).await;

    server
        .delete(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&bo))
        .await
        .assert_status_not_found();

    server
        .get(&format!("/{code}"))
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_delete_requires_token() {
    let server = create_test_server();

    server.delete("/urls/1").await.assert_status(StatusCode::UNAUTHORIZED);
}
