//! Integration tests for the HTTP client, session handling and auth gate

mod common;

use common::*;
use pakads_admin::models::ads::AdDraft;
use pakads_admin::repositories::token_store::LEGACY_TOKEN_KEY;
use pakads_admin::repositories::ApiError;
use pakads_admin::services::auth::AuthGate;
use pakads_admin::services::ServiceError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/admin/approval/pending")))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "rows": [approval_user_json("1", "Ayesha", true)] }
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let users = api.repos.approvals.list_pending().await.expect("pending users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].status, "pending");
}

#[tokio::test]
async fn test_unauthorized_clears_both_token_keys() {
    let api = TestApi::start().await;
    api.tokens
        .set(LEGACY_TOKEN_KEY, "legacy-token")
        .await
        .expect("store legacy token");

    Mock::given(method("GET"))
        .and(path(api_path("/deposits/admin/stats")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&api.server)
        .await;

    let err = api.repos.deposits.stats().await.expect_err("401 must fail");
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Token expired (HTTP 401)");
    assert!(!api.tokens.contains_token().await);
    assert_eq!(api.tokens.get(LEGACY_TOKEN_KEY).await, None);

    let mut gate = AuthGate::new(api.repos.auth.clone(), api.tokens.clone());
    gate.check().await;
    assert!(!gate.is_authenticated());
}

#[tokio::test]
async fn test_error_message_falls_back_to_error_field() {
    let api = TestApi::start().await;

    Mock::given(method("PUT"))
        .and(path(api_path("/admin/withdrawals/w1/approve")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "", "error": "Insufficient balance" })))
        .mount(&api.server)
        .await;

    let err = api
        .repos
        .withdrawals
        .approve("w1")
        .await
        .expect_err("400 must fail");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Insufficient balance (HTTP 400)");
    assert!(api.tokens.contains_token().await);
}

#[tokio::test]
async fn test_login_stores_token_and_accepts_admin() {
    let api = TestApi::signed_out().await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/login")))
        .and(body_json(json!({ "email": "admin@pakads.pk", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "token": "fresh" } })))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "id": 7, "email": "admin@pakads.pk", "role": "admin" } }
        })))
        .mount(&api.server)
        .await;

    let mut gate = AuthGate::new(api.repos.auth.clone(), api.tokens.clone());
    let identity = gate.login("admin@pakads.pk", "secret").await.expect("login");
    assert_eq!(identity.email.as_deref(), Some("admin@pakads.pk"));
    assert!(gate.is_authenticated());
    assert_eq!(api.tokens.token().await.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_non_admin_role_is_rejected() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 3, "email": "someone@pakads.pk", "role": "user" }
        })))
        .mount(&api.server)
        .await;

    let mut gate = AuthGate::new(api.repos.auth.clone(), api.tokens.clone());
    gate.check().await;
    assert!(!gate.is_authenticated());
    assert!(!api.tokens.contains_token().await);
}

#[tokio::test]
async fn test_login_as_non_admin_is_forbidden() {
    let api = TestApi::signed_out().await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "user-token" })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "user" })))
        .mount(&api.server)
        .await;

    let mut gate = AuthGate::new(api.repos.auth.clone(), api.tokens.clone());
    let err = gate.login("someone@pakads.pk", "pw").await.expect_err("must be forbidden");
    assert!(matches!(err, ServiceError::Forbidden));
    assert!(!api.tokens.contains_token().await);
}

#[tokio::test]
async fn test_check_without_token_skips_network() {
    let api = TestApi::signed_out().await;

    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "admin" })))
        .expect(0)
        .mount(&api.server)
        .await;

    let mut gate = AuthGate::new(api.repos.auth.clone(), api.tokens.clone());
    gate.check().await;
    assert!(!gate.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/auth/logout")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api.server)
        .await;

    api.repos.auth.logout().await.expect("logout");
    assert!(!api.tokens.contains_token().await);
}

#[tokio::test]
async fn test_invalid_ad_sends_no_request() {
    let api = TestApi::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("/ads")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&api.server)
        .await;

    let draft = AdDraft {
        title: "Summer sale".to_string(),
        description: "Half price".to_string(),
        price: Some(500.0),
        ..AdDraft::default()
    };
    let err = api.repos.ads.create(&draft).await.expect_err("validation");
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.to_string(), "Category and Location are required");
}

#[tokio::test]
async fn test_bonus_history_nested_under_data() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/daily-referral-bonus/history")))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "bonuses": [
                    { "_id": "b1", "bonusDate": "2026-10-16", "referralsCount": 12, "bonusCount": 2,
                      "bonusAmount": { "pkr": 2000, "usd": 7.1 } },
                    { "_id": "b2", "bonusDate": "2026-10-15", "referralsCount": 5, "bonusCount": 1,
                      "bonusAmount": { "pkr": 1000, "usd": 3.55 } }
                ],
                "pagination": { "page": 1, "totalPages": 1 }
            }
        })))
        .mount(&api.server)
        .await;

    let history = api.repos.daily_bonus.history(1, 20).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date_text(), "2026-10-16");
    assert_eq!(history[0].bonus_count, 2);
    assert_eq!(history[1].bonus_amount.pkr, 1000.0);
}

#[tokio::test]
async fn test_upload_delete_encodes_filename() {
    let api = TestApi::start().await;

    Mock::given(method("DELETE"))
        .and(path(api_path("/upload/banner%20one.png")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&api.server)
        .await;

    api.repos.upload.delete("banner one.png").await.expect("delete upload");
}
