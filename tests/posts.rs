//! Post CRUD and listing tests
//!
//! Covers creation, reading, full replacement, deletion, and the filtered,
//! sorted, paginated listing.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::{json, Value};
use uuid::Uuid;

fn descriptions(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["description"].as_str().unwrap().to_string())
        .collect()
}

// ===========================================================================
// Post Creation
// ===========================================================================

#[tokio::test]
async fn create_post_valid() {
    let app = app();
    let user = app.create_user("post_create").await;

    let resp = app
        .post_json(
            "/posts",
            json!({
                "dateTime": "2025-01-15T08:30:00Z",
                "description": "Morning run",
                "duration": "45 phút",
            }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["message"], "Post created successfully");
    assert!(body["post"]["id"].is_string());
    assert_eq!(body["post"]["dateTime"], "2025-01-15T08:30:00Z");
    assert_eq!(body["post"]["description"], "Morning run");
    assert_eq!(body["post"]["duration"], "45 phút");
    assert!(body["post"]["createdAt"].is_string());
    assert!(body["post"]["updatedAt"].is_string());
}

#[tokio::test]
async fn create_post_normalizes_offset_to_utc_instant() {
    let app = app();
    let user = app.create_user("post_offset").await;

    let resp = app
        .post_json(
            "/posts",
            json!({
                "dateTime": "2025-01-15T15:30:00+07:00",
                "description": "Lunch",
                "duration": "1h",
            }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["post"]["dateTime"], "2025-01-15T08:30:00Z");
    let id = body["post"]["id"].as_str().unwrap().to_string();

    let resp = app.get("/posts?limit=5", Some(&user.access_token)).await;
    let body = resp.json();
    assert_eq!(body["data"][0]["id"].as_str().unwrap(), id);
    assert_eq!(body["data"][0]["timeOfDay"], "afternoon");
}

#[tokio::test]
async fn create_post_missing_fields() {
    let app = app();
    let user = app.create_user("post_missing").await;

    let resp = app
        .post_json(
            "/posts",
            json!({ "dateTime": "2025-01-15T08:30:00Z", "duration": "1h" }),
            Some(&user.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "description is required");

    let resp = app
        .post_json(
            "/posts",
            json!({ "dateTime": "2025-01-15T08:30:00Z", "description": "x", "duration": "" }),
            Some(&user.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "duration is required");

    let resp = app
        .post_json(
            "/posts",
            json!({ "description": "x", "duration": "1h" }),
            Some(&user.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "dateTime is required");
}

#[tokio::test]
async fn create_post_description_too_long() {
    let app = app();
    let user = app.create_user("post_long").await;

    let resp = app
        .post_json(
            "/posts",
            json!({
                "dateTime": "2025-01-15T08:30:00Z",
                "description": "a".repeat(2001),
                "duration": "1h",
            }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "description must be at most 2000 characters");
}

#[tokio::test]
async fn posts_require_authentication() {
    let app = app();

    let resp = app.get("/posts", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_message(), "missing Authorization header");

    let resp = app.get("/posts", Some("not-a-token")).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_message(), "invalid token");
}

// ===========================================================================
// Read / Update / Delete
// ===========================================================================

#[tokio::test]
async fn get_post() {
    let app = app();
    let user = app.create_user("post_get").await;
    let post_id = app
        .create_post(&user.access_token, "2025-02-01T01:00:00Z", "Coffee")
        .await;

    let resp = app
        .get(&format!("/posts/{}", post_id), Some(&user.access_token))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["id"].as_str().unwrap(), post_id.to_string());
    assert_eq!(body["description"], "Coffee");
}

#[tokio::test]
async fn get_nonexistent_post() {
    let app = app();
    let user = app.create_user("post_get_missing").await;

    let resp = app
        .get(&format!("/posts/{}", Uuid::new_v4()), Some(&user.access_token))
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "post not found");
}

#[tokio::test]
async fn update_post_replaces_all_fields() {
    let app = app();
    let user = app.create_user("post_update").await;
    let post_id = app
        .create_post(&user.access_token, "2025-02-01T01:00:00Z", "Coffee")
        .await;

    let resp = app
        .put_json(
            &format!("/posts/{}", post_id),
            json!({
                "dateTime": "2025-02-02T12:00:00Z",
                "description": "Dinner",
                "duration": "2 giờ",
            }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["message"], "Post updated successfully");
    assert_eq!(body["post"]["id"].as_str().unwrap(), post_id.to_string());
    assert_eq!(body["post"]["dateTime"], "2025-02-02T12:00:00Z");
    assert_eq!(body["post"]["description"], "Dinner");
    assert_eq!(body["post"]["duration"], "2 giờ");

    let resp = app
        .get(&format!("/posts/{}", post_id), Some(&user.access_token))
        .await;
    assert_eq!(resp.json()["description"], "Dinner");
}

#[tokio::test]
async fn update_post_requires_every_field() {
    let app = app();
    let user = app.create_user("post_update_partial").await;
    let post_id = app
        .create_post(&user.access_token, "2025-02-01T01:00:00Z", "Coffee")
        .await;

    let resp = app
        .put_json(
            &format!("/posts/{}", post_id),
            json!({ "description": "Tea" }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "dateTime is required");
}

#[tokio::test]
async fn update_nonexistent_post() {
    let app = app();
    let user = app.create_user("post_update_missing").await;

    let resp = app
        .put_json(
            &format!("/posts/{}", Uuid::new_v4()),
            json!({
                "dateTime": "2025-02-02T12:00:00Z",
                "description": "Dinner",
                "duration": "2h",
            }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "post not found");
}

#[tokio::test]
async fn delete_post() {
    let app = app();
    let user = app.create_user("post_delete").await;
    let post_id = app
        .create_post(&user.access_token, "2025-02-01T01:00:00Z", "Coffee")
        .await;

    let resp = app
        .delete(&format!("/posts/{}", post_id), Some(&user.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["message"], "Post deleted successfully");

    let resp = app
        .get(&format!("/posts/{}", post_id), Some(&user.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app
        .delete(&format!("/posts/{}", post_id), Some(&user.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// ===========================================================================
// Listing
// ===========================================================================

#[tokio::test]
async fn list_posts_envelope_and_defaults() {
    let app = app();
    let user = app.create_user("post_list_defaults").await;
    for day in 1..=12 {
        app.create_post(
            &user.access_token,
            &format!("2025-03-{:02}T02:00:00Z", day),
            &format!("day {}", day),
        )
        .await;
    }

    let resp = app.get("/posts", Some(&user.access_token)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["total"], 12);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    // newest first by default
    assert_eq!(body["data"][0]["description"], "day 12");
}

#[tokio::test]
async fn list_posts_text_filter_pagination() {
    let app = app();
    let user = app.create_user("post_list_gym").await;
    for i in 0..25 {
        app.create_post(
            &user.access_token,
            &format!("2025-04-{:02}T03:00:00Z", i + 1),
            &format!("GYM day {}", i),
        )
        .await;
    }
    for i in 0..4 {
        app.create_post(
            &user.access_token,
            &format!("2025-05-{:02}T03:00:00Z", i + 1),
            "reading",
        )
        .await;
    }

    let resp = app
        .get("/posts?description=gym&page=3&limit=10", Some(&user.access_token))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["total"], 25);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let resp = app
        .get("/posts?description=gym&page=4&limit=10", Some(&user.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json()["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_posts_time_of_day_filter_and_sort() {
    let app = app();
    let user = app.create_user("post_list_bucket").await;
    // local = UTC + 7
    app.create_post(&user.access_token, "2025-06-01T14:00:00Z", "late night").await;
    app.create_post(&user.access_token, "2025-06-02T01:00:00Z", "breakfast").await;
    app.create_post(&user.access_token, "2025-06-03T05:30:00Z", "lunch").await;
    app.create_post(&user.access_token, "2025-06-04T08:00:00Z", "meeting").await;
    app.create_post(&user.access_token, "2025-06-04T21:30:00Z", "before dawn").await;

    let resp = app
        .get("/posts?timeOfDay=evening&sortOrder=asc", Some(&user.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(descriptions(&resp.json()), vec!["late night", "before dawn"]);

    let body = resp.json();
    assert_eq!(body["data"][0]["timeOfDay"], "evening");
    assert_eq!(body["data"][0]["timeOfDayLabel"], "Tối");

    let resp = app
        .get("/posts?sortBy=timeOfDay&sortOrder=asc", Some(&user.access_token))
        .await;
    let body = resp.json();
    assert_eq!(
        descriptions(&body),
        vec!["breakfast", "lunch", "meeting", "late night", "before dawn"]
    );
    let labels: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["timeOfDayLabel"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Sáng", "Trưa", "Chiều", "Tối", "Tối"]);

    let resp = app
        .get("/posts?sortBy=timeOfDay&sortOrder=desc", Some(&user.access_token))
        .await;
    assert_eq!(
        descriptions(&resp.json()),
        vec!["late night", "before dawn", "meeting", "lunch", "breakfast"]
    );
}

#[tokio::test]
async fn list_posts_date_time_orders_are_reversed() {
    let app = app();
    let user = app.create_user("post_list_order").await;
    for (date, name) in [
        ("2025-07-03T00:00:00Z", "c"),
        ("2025-07-01T00:00:00Z", "a"),
        ("2025-07-02T00:00:00Z", "b"),
    ] {
        app.create_post(&user.access_token, date, name).await;
    }

    let asc = app
        .get("/posts?sortBy=dateTime&sortOrder=asc", Some(&user.access_token))
        .await;
    let desc = app
        .get("/posts?sortBy=dateTime&sortOrder=desc", Some(&user.access_token))
        .await;

    let asc = descriptions(&asc.json());
    let mut desc = descriptions(&desc.json());
    desc.reverse();
    assert_eq!(asc, vec!["a", "b", "c"]);
    assert_eq!(asc, desc);
}

#[tokio::test]
async fn list_posts_calendar_filters() {
    let app = app();
    let user = app.create_user("post_list_calendar").await;
    // Saturday 2025-02-01 03:00 local
    app.create_post(&user.access_token, "2025-01-31T20:00:00Z", "saturday").await;
    // Sunday 2025-02-02 10:00 local
    app.create_post(&user.access_token, "2025-02-02T03:00:00Z", "sunday").await;
    // Friday 2025-01-31 10:00 local
    app.create_post(&user.access_token, "2025-01-31T03:00:00Z", "friday").await;

    let resp = app.get("/posts?month=2", Some(&user.access_token)).await;
    assert_eq!(descriptions(&resp.json()), vec!["sunday", "saturday"]);

    let resp = app.get("/posts?weekday=8", Some(&user.access_token)).await;
    assert_eq!(descriptions(&resp.json()), vec!["sunday"]);

    let resp = app.get("/posts?weekday=6", Some(&user.access_token)).await;
    assert_eq!(descriptions(&resp.json()), vec!["saturday"]);

    let resp = app.get("/posts?weekday=7", Some(&user.access_token)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_posts_weekday_one_is_monday() {
    let app = app();
    let user = app.create_user("post_list_monday").await;
    // Monday 2025-01-06 10:00 local
    app.create_post(&user.access_token, "2025-01-06T03:00:00Z", "monday").await;
    // Tuesday 2025-01-07 10:00 local
    app.create_post(&user.access_token, "2025-01-07T03:00:00Z", "tuesday").await;

    let resp = app.get("/posts?weekday=1", Some(&user.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["total"], 1);
    assert_eq!(descriptions(&resp.json()), vec!["monday"]);

    let resp = app.get("/posts?weekday=2", Some(&user.access_token)).await;
    assert_eq!(descriptions(&resp.json()), vec!["tuesday"]);
}

#[tokio::test]
async fn list_posts_rejects_invalid_parameters() {
    let app = app();
    let user = app.create_user("post_list_invalid").await;

    let cases = [
        ("/posts?limit=0", "limit must be between 1 and 100"),
        ("/posts?limit=-1", "limit must be between 1 and 100"),
        ("/posts?limit=abc", "limit must be a number"),
        ("/posts?page=0", "page must be at least 1"),
        ("/posts?sortBy=newest", "sortBy must be dateTime or timeOfDay"),
        ("/posts?sortOrder=up", "sortOrder must be asc or desc"),
        (
            "/posts?timeOfDay=night",
            "timeOfDay must be one of morning, noon, afternoon, evening",
        ),
    ];

    for (path, message) in cases {
        let resp = app.get(path, Some(&user.access_token)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(resp.error_message(), message, "{}", path);
    }
}
