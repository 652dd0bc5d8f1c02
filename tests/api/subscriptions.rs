use chrono::{Duration, Months};

use reqwest::{Method, StatusCode};

use serde_json::json;

use uuid::Uuid;

use crate::helpers::{assert_amount, json_body, today, TestApp};

#[tokio::test]
async fn create_returns_created_subscription() {
    let app = TestApp::spawn().await;

    let res = app
        .subscription_create(&json!({
            "name": "Netflix",
            "category": "Streaming",
            "price": 15.99,
            "frequency": "monthly",
            "startDate": "2025-01-31"
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());

    let body = json_body(res).await;
    assert_eq!(true, body["success"]);
    assert_eq!("Subscription added successfully", body["message"]);

    let data = &body["data"];
    assert_eq!("Netflix", data["name"]);
    assert_eq!("Streaming", data["category"]);
    assert_eq!("active", data["status"]);
    assert_eq!(app.owner_id.to_string(), data["ownerId"]);
    assert_eq!("2025-02-28", data["nextBillingDate"]);
    assert_amount(15.99, &data["price"]);
    assert!(data["id"].is_string());
    assert!(data["createdAt"].is_string());
}

#[tokio::test]
async fn create_applies_defaults() {
    let app = TestApp::spawn().await;

    let data = app
        .create_subscription(json!({ "name": "Gym", "price": 40 }))
        .await;

    assert_eq!("Other", data["category"]);
    assert_eq!("monthly", data["frequency"]);
    assert_eq!("active", data["status"]);
    assert_eq!(today().to_string(), data["startDate"]);

    let expected = today().checked_add_months(Months::new(1)).unwrap();
    assert_eq!(expected.to_string(), data["nextBillingDate"]);
}

#[tokio::test]
async fn create_rejects_missing_name_or_price() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        ("missing name", json!({ "price": 9.99 })),
        ("missing price", json!({ "name": "Netflix" })),
        ("zero price", json!({ "name": "Netflix", "price": 0 })),
        ("blank name", json!({ "name": "  ", "price": 9.99 })),
    ];

    for (desc, body) in test_cases {
        let res = app
            .subscription_create(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", desc);

        let body = json_body(res).await;
        assert_eq!(false, body["success"], "{}", desc);
        assert_eq!("Please provide name and price", body["message"], "{}", desc);
    }

    assert_eq!(0, json_body(app.subscription_list("").await.unwrap()).await["count"]);
}

#[tokio::test]
async fn create_rejects_malformed_payloads() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        ("unknown frequency", json!({ "name": "Netflix", "price": 9.99, "frequency": "weekly" })),
        ("unknown category", json!({ "name": "Netflix", "price": 9.99, "category": "Games" })),
        ("bad date", json!({ "name": "Netflix", "price": 9.99, "startDate": "31/01/2025" })),
        ("price as text", json!({ "name": "Netflix", "price": "cheap" })),
    ];

    for (desc, body) in test_cases {
        let res = app
            .subscription_create(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", desc);
        assert_eq!(false, json_body(res).await["success"], "{}", desc);
    }
}

#[tokio::test]
async fn requests_without_a_valid_token_are_unauthorized() {
    let app = TestApp::spawn().await;

    let res = app
        .request(Method::GET, "subscriptions")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
    assert_eq!(false, json_body(res).await["success"]);

    let res = app
        .request(Method::GET, "subscriptions")
        .bearer_auth("not-a-token")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    let res = app
        .request(Method::GET, "subscriptions/stats/overview")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}

#[tokio::test]
async fn list_returns_owned_subscriptions_newest_first() {
    let app = TestApp::spawn().await;

    app.create_subscription(json!({ "name": "Netflix", "price": 15.99 }))
        .await;
    app.create_subscription(json!({ "name": "Spotify", "price": 9.99 }))
        .await;

    // Another owner's records stay invisible
    app.owner_request(Method::POST, "subscriptions", Uuid::new_v4())
        .json(&json!({ "name": "Hulu", "price": 7.99 }))
        .send()
        .await
        .expect("Failed to execute request");

    let res = app
        .subscription_list("")
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body = json_body(res).await;
    assert_eq!(true, body["success"]);
    assert_eq!(2, body["count"]);
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|subscription| subscription["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(vec!["Spotify", "Netflix"], names);
}

#[tokio::test]
async fn list_can_filter_by_status_and_search() {
    let app = TestApp::spawn().await;

    app.create_subscription(json!({ "name": "Netflix", "price": 15.99 }))
        .await;
    app.create_subscription(json!({ "name": "Netflix Kids", "price": 4.99, "status": "paused" }))
        .await;
    app.create_subscription(json!({ "name": "Spotify", "price": 9.99 }))
        .await;

    let body = json_body(app.subscription_list("?status=paused").await.unwrap()).await;
    assert_eq!(1, body["count"]);
    assert_eq!("Netflix Kids", body["data"][0]["name"]);

    let body = json_body(app.subscription_list("?search=netflix").await.unwrap()).await;
    assert_eq!(2, body["count"]);

    let body = json_body(
        app.subscription_list("?status=active&search=NETFLIX")
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(1, body["count"]);
    assert_eq!("Netflix", body["data"][0]["name"]);

    let res = app.subscription_list("?status=bogus").await.unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
}

#[tokio::test]
async fn get_returns_single_subscription() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({ "name": "Notion", "price": 8, "category": "Productivity" }))
        .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .subscription_get(id)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body = json_body(res).await;
    assert_eq!(true, body["success"]);
    assert_eq!(created, body["data"]);
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let app = TestApp::spawn().await;

    for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let res = app
            .subscription_get(&id)
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::NOT_FOUND, res.status(), "{}", id);

        let body = json_body(res).await;
        assert_eq!(false, body["success"]);
        assert_eq!("Subscription not found", body["message"]);

        let res = app
            .subscription_update(&id, &json!({ "price": 1 }))
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::NOT_FOUND, res.status(), "{}", id);

        let res = app
            .subscription_delete(&id)
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::NOT_FOUND, res.status(), "{}", id);
    }
}

#[tokio::test]
async fn other_owners_are_forbidden() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({ "name": "Netflix", "price": 15.99 }))
        .await;
    let id = created["id"].as_str().unwrap();
    let url = format!("subscriptions/{}", id);
    let intruder = Uuid::new_v4();

    let test_cases = vec![
        ("access", Method::GET),
        ("update", Method::PUT),
        ("delete", Method::DELETE),
    ];

    for (action, method) in test_cases {
        let res = app
            .owner_request(method, &url, intruder)
            .json(&json!({ "price": 0.99 }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::FORBIDDEN, res.status(), "{}", action);

        let body = json_body(res).await;
        assert_eq!(false, body["success"]);
        assert_eq!(
            format!("Not authorized to {} this subscription", action),
            body["message"]
        );
    }

    // Still intact for the owner
    let body = json_body(app.subscription_get(id).await.unwrap()).await;
    assert_eq!(created, body["data"]);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({
            "name": "Netflix",
            "price": 15.99,
            "startDate": "2025-01-15",
            "description": "Family plan"
        }))
        .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .subscription_update(
            id,
            &json!({ "price": 17.99, "status": "paused", "ownerId": Uuid::new_v4() }),
        )
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body = json_body(res).await;
    assert_eq!(true, body["success"]);
    assert_eq!("Subscription updated successfully", body["message"]);

    let data = &body["data"];
    assert_amount(17.99, &data["price"]);
    assert_eq!("paused", data["status"]);
    assert_eq!("Netflix", data["name"]);
    assert_eq!("Family plan", data["description"]);
    assert_eq!(created["ownerId"], data["ownerId"]);
    assert_eq!(created["createdAt"], data["createdAt"]);
    assert_eq!(created["nextBillingDate"], data["nextBillingDate"]);
}

#[tokio::test]
async fn update_can_recompute_next_billing_date() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({
            "name": "Adobe",
            "price": 54.99,
            "startDate": "2024-02-29"
        }))
        .await;
    assert_eq!("2024-03-29", created["nextBillingDate"]);
    let id = created["id"].as_str().unwrap();

    let body = json_body(
        app.subscription_update(
            id,
            &json!({ "frequency": "yearly", "recomputeNextBillingDate": true }),
        )
        .await
        .unwrap(),
    )
    .await;

    assert_eq!("yearly", body["data"]["frequency"]);
    assert_eq!("2025-02-28", body["data"]["nextBillingDate"]);
}

#[tokio::test]
async fn update_rejects_invalid_values() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({ "name": "Netflix", "price": 15.99 }))
        .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .subscription_update(id, &json!({ "price": -1 }))
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!("Price cannot be negative", json_body(res).await["message"]);

    let res = app
        .subscription_update(id, &json!({ "status": "expired" }))
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let res = app
        .authorized_request(Method::PUT, &format!("subscriptions/{}", id))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!(false, json_body(res).await["success"]);

    // Nothing was changed
    let body = json_body(app.subscription_get(id).await.unwrap()).await;
    assert_eq!(created, body["data"]);
}

#[tokio::test]
async fn delete_removes_subscription() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({ "name": "Netflix", "price": 15.99 }))
        .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .subscription_delete(id)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body = json_body(res).await;
    assert_eq!(true, body["success"]);
    assert_eq!("Subscription deleted successfully", body["message"]);
    assert!(body.get("data").is_none());

    let res = app.subscription_get(id).await.unwrap();
    assert_eq!(StatusCode::NOT_FOUND, res.status());

    let res = app.subscription_delete(id).await.unwrap();
    assert_eq!(StatusCode::NOT_FOUND, res.status());
}

#[tokio::test]
async fn explicit_next_billing_date_is_kept() {
    let app = TestApp::spawn().await;
    let next_billing_date = today() + Duration::days(3);

    let created = app
        .create_subscription(json!({
            "name": "Duolingo",
            "price": 6.99,
            "category": "Education",
            "nextBillingDate": next_billing_date
        }))
        .await;

    assert_eq!(next_billing_date.to_string(), created["nextBillingDate"]);
}

#[tokio::test]
async fn prices_beyond_storage_bound_are_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .subscription_create(&json!({ "name": "Huge", "price": 1e28 }))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let body = json_body(res).await;
    assert_eq!(false, body["success"]);
    assert_eq!("Price cannot exceed 9999999999.99", body["message"]);

    let created = app
        .create_subscription(json!({ "name": "Netflix", "price": 15.99 }))
        .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .subscription_update(id, &json!({ "price": 1e28 }))
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!("Price cannot exceed 9999999999.99", json_body(res).await["message"]);

    // Charts still render with only the valid record stored
    let res = app.stats("yearly-chart").await.unwrap();
    assert_eq!(StatusCode::OK, res.status());
    let body = json_body(res).await;
    assert_amount(191.88, &body["data"][11]["spending"]);
}

#[tokio::test]
async fn update_with_null_clears_end_date() {
    let app = TestApp::spawn().await;

    let created = app
        .create_subscription(json!({
            "name": "Hulu",
            "price": 7.99,
            "endDate": "2025-12-31",
            "description": "Trial"
        }))
        .await;
    assert_eq!("2025-12-31", created["endDate"]);
    let id = created["id"].as_str().unwrap();

    let body = json_body(
        app.subscription_update(id, &json!({ "name": "Hulu Basic" }))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!("2025-12-31", body["data"]["endDate"]);
    assert_eq!("Trial", body["data"]["description"]);

    let body = json_body(
        app.subscription_update(id, &json!({ "endDate": null, "description": null }))
            .await
            .unwrap(),
    )
    .await;
    assert!(body["data"]["endDate"].is_null());
    assert!(body["data"]["description"].is_null());
    assert_eq!("Hulu Basic", body["data"]["name"]);
}
