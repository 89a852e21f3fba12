//! Integration tests for the ads, notices, users and wallet resources

mod common;

use common::*;
use pakads_admin::models::users::UserPatch;
use pakads_admin::views::ads::AdsView;
use pakads_admin::views::notices::NoticesView;
use pakads_admin::views::reward_income::RewardIncomeView;
use pakads_admin::views::users::{TabCounts, UserTab, UsersView};
use pakads_admin::views::Screen;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_ad_toggle_rejects_active_ad_and_resolves_taxonomy() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/ads")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "ads": [
                { "id": "ad1", "title": "Bike for sale", "status": "active", "views": 120, "clicks": 9,
                  "price": 45000, "category_id": "c1", "location_id": "l9" },
                { "id": "ad2", "title": "Flat to rent", "status": "pending", "views_count": 30, "clicks_count": 1 }
            ] }
        })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "c1", "name": "Vehicles" }]
        })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/locations")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/ads/ad1/reject")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/ads/ad1/approve")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api.server)
        .await;

    let mut view = AdsView::new(
        api.repos.ads.clone(),
        api.repos.categories.clone(),
        api.repos.locations.clone(),
    );
    view.refresh().await;

    let totals = view.totals();
    assert_eq!((totals.views, totals.clicks, totals.active), (150, 10, 1));
    assert!(view.locations.error().is_some());

    let screen = view.render();
    assert!(screen.contains("Vehicles"));
    assert!(screen.contains("l9"));

    view.toggle_status("ad1").await.expect("toggle");
}

#[tokio::test]
async fn test_notice_toggle_sends_status_only() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/notices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notices": [
                { "id": "n1", "type": "phone", "title": "Helpline", "content": "0300-1234567", "status": "active" },
                { "id": "n2", "type": "general", "title": "Maintenance", "content": "Sunday", "status": "inactive" }
            ]
        })))
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/notices/n1")))
        .and(body_json(json!({ "status": "inactive" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&api.server)
        .await;

    let mut view = NoticesView::new(api.repos.notices.clone());
    view.refresh().await;
    assert_eq!(view.active_count(), 1);
    assert_eq!(view.active_phone_count(), 1);

    view.toggle_active("n1").await.expect("toggle");

    let err = view.toggle_active("missing").await.expect_err("not loaded");
    assert_eq!(err.to_string(), "Notice missing is not loaded");
    assert_eq!(view.action_error.as_deref(), Some("Notice missing is not loaded"));
}

#[tokio::test]
async fn test_user_tabs_and_patch() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "users": [
                { "id": "u1", "name": "Kashif", "status": "active", "balance": 120.5 },
                { "id": "u2", "name": "Lubna", "status": "active", "balance": 0 },
                { "id": "u3", "name": "Mehwish", "status": "inactive", "walletBalance": "8" }
            ] }
        })))
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/users/u3")))
        .and(body_json(json!({ "status": "active" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&api.server)
        .await;

    let mut view = UsersView::new(api.repos.users.clone());
    view.refresh().await;
    assert_eq!(
        view.counts(),
        TabCounts {
            all: 3,
            active: 2,
            with_balance: 2
        }
    );

    view.tab = UserTab::WithBalance;
    let ids: Vec<&str> = view.rows().iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["u1", "u3"]);

    let patch = UserPatch {
        status: Some("active".to_string()),
        ..UserPatch::default()
    };
    view.update("u3", &patch).await.expect("update");
}

#[tokio::test]
async fn test_wallet_withdrawals() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/wallet/withdrawals")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "withdrawals": [
                { "_id": "w9", "amount": 15.5, "status": "pending",
                  "user": { "_id": "u1", "name": "Kashif" } }
            ] }
        })))
        .mount(&api.server)
        .await;

    let withdrawals = api.repos.wallet.withdrawals().await.expect("withdrawals");
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].amount, Some(15.5));
    assert_eq!(
        withdrawals[0].user.as_ref().and_then(|u| u.label()),
        Some("Kashif")
    );
}

#[tokio::test]
async fn test_user_details_fetch_single_user() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/users/u7")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "_id": "u7", "name": "Noor", "email": "noor@example.com",
                                "status": "active", "walletBalance": "42.5" } }
        })))
        .expect(2)
        .mount(&api.server)
        .await;

    let user = api.repos.users.get("u7").await.expect("user");
    assert_eq!(user.id, "u7");
    assert_eq!(user.name.as_deref(), Some("Noor"));
    assert_eq!(user.balance, Some(42.5));

    let mut view = UsersView::new(api.repos.users.clone());
    view.show("u7").await.expect("details");
    let screen = view.render();
    assert!(screen.contains("User details"));
    assert!(screen.contains("noor@example.com"));
    assert!(screen.contains("42.50"));
}

#[tokio::test]
async fn test_active_notices_use_published_endpoint() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/notices/active")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "notices": [
                { "id": "n1", "type": "phone", "title": "Helpline", "content": "0300-1234567", "status": "active" }
            ] }
        })))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/notices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "notices": [] })))
        .expect(0)
        .mount(&api.server)
        .await;

    let mut view = NoticesView::new(api.repos.notices.clone());
    view.active_only = true;
    view.refresh().await;

    let ids: Vec<&str> = view.rows().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n1"]);
    assert_eq!(view.active_phone_count(), 1);
    assert!(view.render().contains("Showing published notices only"));
}

#[tokio::test]
async fn test_notice_get_unwraps_envelope() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/notices/n2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": "n2", "type": "general", "title": "Maintenance", "content": "Sunday", "status": "inactive" }
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let notice = api.repos.notices.get("n2").await.expect("notice");
    assert_eq!(notice.id, "n2");
    assert_eq!(notice.title.as_deref(), Some("Maintenance"));
    assert!(!notice.is_active);
}

#[tokio::test]
async fn test_user_commission_breakdown() {
    let api = TestApi::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/commissions/admin/user/u3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "totalEarned": 750, "commissions": [{ "amount": 250, "level": 1 }] }
        })))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/commissions/admin/user/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "User not found" })))
        .mount(&api.server)
        .await;

    let breakdown = api.repos.commissions.user_admin("u3").await.expect("breakdown");
    assert_eq!(breakdown["totalEarned"], 750);

    let mut view = RewardIncomeView::new(api.repos.commissions.clone());
    let err = view.show_user("missing").await.expect_err("unknown user");
    assert_eq!(err.status(), Some(404));
    assert_eq!(view.action_error.as_deref(), Some("User not found (HTTP 404)"));
    assert!(view.user_commissions.is_none());
}

#[tokio::test]
async fn test_distribute_posts_payload() {
    let api = TestApi::start().await;
    let payload = json!({ "depositId": "d1", "userId": "u1", "amount": 1000 });

    Mock::given(method("POST"))
        .and(path(api_path("/commissions/distribute")))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "distributed": 3, "totalAmount": 150 }
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let result = api.repos.commissions.distribute(&payload).await.expect("distribute");
    assert_eq!(result, json!({ "distributed": 3, "totalAmount": 150 }));
}
