use axum::http::StatusCode;
use serde_json::json;

use crate::common::{self, TestClient, test_data};

#[tokio::test]
async fn test_activity_log_and_pagination() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "activity").await;
    let activities_url = format!("/users/{user_id}/activities");

    for activity_type in ["resource_viewed", "resource_viewed", "learning_path_completed"] {
        let response = client
            .post_json(
                &activities_url,
                &json!({ "activity_type": activity_type, "details": { "id": 7 } }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    // Unfiltered, paginated two at a time.
    let response = client.get(&format!("{activities_url}?per_page=2")).await;
    response.assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(body["total_activities"], 3);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["activities"].as_array().unwrap().len(), 2);

    // Filtered by type.
    let response = client
        .get(&format!("{activities_url}?activity_type=learning_path_completed"))
        .await;
    let body = response.json();
    assert_eq!(body["total_activities"], 1);
    assert_eq!(
        body["activities"][0]["activity_type"],
        "learning_path_completed"
    );

    // Empty activity_type is rejected.
    let response = client
        .post_json(&activities_url, &json!({ "activity_type": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_notes_feed_the_note_taker_achievement() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "notes").await;
    let notes_url = format!("/users/{user_id}/notes");

    for i in 0..10 {
        let response = client
            .post_json(
                &notes_url,
                &json!({
                    "title": format!("lecture notes {i}"),
                    "content": "summary",
                    "tags": ["rust", "backend"],
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = client.get(&format!("{notes_url}?per_page=5")).await;
    response.assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(body["total_notes"], 10);
    assert_eq!(body["pages"], 2);

    // Ten notes satisfy "Note Taker" (150 points).
    let response = client
        .post(&format!("/users/{user_id}/gamification/achievements/check"))
        .await;
    response.assert_status(StatusCode::OK);
    let newly = response.json()["newly_earned"].clone();
    assert_eq!(newly[0]["name"], "Note Taker");

    let response = client
        .get(&format!("/users/{user_id}/gamification/profile"))
        .await;
    let level = &response.json()["profile"]["level"];
    assert_eq!(level["achievement_points"], 150);
    assert_eq!(level["total_points"], 150);
}

#[tokio::test]
async fn test_note_validation() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "notecheck").await;

    let response = client
        .post_json(
            &format!("/users/{user_id}/notes"),
            &json!({ "title": "", "content": "body" }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = client
        .post_json(
            &format!("/users/{user_id}/notes"),
            &json!({ "title": "ok", "content": "" }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
