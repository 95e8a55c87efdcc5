use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{self, TestClient, test_data};

fn names_of(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_award_points_and_level_boundaries() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "points").await;
    let points_url = format!("/users/{user_id}/gamification/points");

    // 100 points is not enough for level 2 (which costs 400 in total).
    let response = client
        .post_json(&points_url, &json!({ "points": 100, "category": "learning" }))
        .await;
    response.assert_status(StatusCode::OK);
    let level = &response.json()["level"];
    assert_eq!(level["current_level"], 1);
    assert_eq!(level["total_points"], 100);
    assert_eq!(level["points_to_next_level"], 300);
    assert_eq!(level["learning_points"], 100);

    // Exactly 400 total reaches level 2.
    let response = client
        .post_json(&points_url, &json!({ "points": 300, "category": "learning" }))
        .await;
    let level = &response.json()["level"];
    assert_eq!(level["current_level"], 2);
    assert_eq!(level["total_points"], 400);
    assert_eq!(level["points_to_next_level"], 500);

    // 1,000 total jumps past level 3's 900 threshold in one award.
    let response = client
        .post_json(&points_url, &json!({ "points": 600, "category": "quiz" }))
        .await;
    let level = &response.json()["level"];
    assert_eq!(level["current_level"], 3);
    assert_eq!(level["total_points"], 1000);
    assert_eq!(level["quiz_points"], 600);

    // Zero is a valid no-op award.
    let response = client
        .post_json(&points_url, &json!({ "points": 0, "category": "social" }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["level"]["total_points"], 1000);

    // Negative awards are rejected before any write.
    let response = client
        .post_json(&points_url, &json!({ "points": -5, "category": "learning" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let response = client
        .get(&format!("/users/{user_id}/gamification/profile"))
        .await;
    assert_eq!(response.json()["profile"]["level"]["total_points"], 1000);
}

#[tokio::test]
async fn test_streak_transitions() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "streak").await;
    let streak_url = format!("/users/{user_id}/gamification/streak");

    // First activity starts the streak.
    let response = client
        .post_json(&streak_url, &json!({ "date": "2025-03-10" }))
        .await;
    response.assert_status(StatusCode::OK);
    let level = &response.json()["level"];
    assert_eq!(level["current_learning_streak"], 1);
    assert_eq!(level["longest_learning_streak"], 1);

    // Same day again is a no-op.
    let response = client
        .post_json(&streak_url, &json!({ "date": "2025-03-10" }))
        .await;
    assert_eq!(response.json()["level"]["current_learning_streak"], 1);

    // Next day extends.
    let response = client
        .post_json(&streak_url, &json!({ "date": "2025-03-11" }))
        .await;
    let level = &response.json()["level"];
    assert_eq!(level["current_learning_streak"], 2);
    assert_eq!(level["longest_learning_streak"], 2);

    // A three-day gap resets the streak but keeps the longest.
    let response = client
        .post_json(&streak_url, &json!({ "date": "2025-03-14" }))
        .await;
    let level = &response.json()["level"];
    assert_eq!(level["current_learning_streak"], 1);
    assert_eq!(level["longest_learning_streak"], 2);

    // An out-of-order date is clamped to a reset, never a decrement.
    let response = client
        .post_json(&streak_url, &json!({ "date": "2025-03-12" }))
        .await;
    let level = &response.json()["level"];
    assert_eq!(level["current_learning_streak"], 1);
    assert_eq!(level["longest_learning_streak"], 2);
    assert_eq!(level["last_activity_date"], "2025-03-12");
}

#[tokio::test]
async fn test_quiz_attempt_grants_achievements_with_snapshot_semantics() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "quiz").await;

    // A perfect first quiz: 10 quiz points, plus "Quiz Rookie" (50) and
    // "Perfect Score" (1500) from the achievement pass.
    let response = client
        .post_json(
            &format!("/users/{user_id}/quiz-attempts"),
            &json!({ "quiz_id": 1, "score": 10.0, "max_score": 10.0 }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json();

    assert_eq!(body["points_awarded"], 10);
    assert_eq!(body["attempt"]["percentage"], 100.0);

    let names = names_of(&body["newly_earned_achievements"]);
    assert!(names.contains(&"Quiz Rookie".to_string()));
    assert!(names.contains(&"Perfect Score".to_string()));
    // The grants pushed the total past 1,000, but "Rising Star" evaluates
    // against the point total from before this pass's grants.
    assert!(!names.contains(&"Rising Star".to_string()));

    let level = &body["level"];
    assert_eq!(level["total_points"], 1560);
    assert_eq!(level["quiz_points"], 10);
    assert_eq!(level["achievement_points"], 1550);
    assert_eq!(level["current_level"], 3);
    assert_eq!(level["points_to_next_level"], 40);
    assert_eq!(level["current_learning_streak"], 1);

    // The next check sees the new total and grants "Rising Star".
    let response = client
        .post(&format!("/users/{user_id}/gamification/achievements/check"))
        .await;
    response.assert_status(StatusCode::OK);
    let names = names_of(&response.json()["newly_earned"]);
    assert_eq!(names, vec!["Rising Star".to_string()]);

    // 1,660 total crosses level 4's 1,600 threshold.
    let response = client
        .get(&format!("/users/{user_id}/gamification/profile"))
        .await;
    let level = &response.json()["profile"]["level"];
    assert_eq!(level["total_points"], 1660);
    assert_eq!(level["current_level"], 4);
}

#[tokio::test]
async fn test_achievement_checks_never_regrant() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "regrant").await;

    // Completing a learning path satisfies "First Steps".
    let response = client
        .post_json(
            &format!("/users/{user_id}/activities"),
            &json!({ "activity_type": "learning_path_completed" }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let check_url = format!("/users/{user_id}/gamification/achievements/check");
    let response = client.post(&check_url).await;
    let names = names_of(&response.json()["newly_earned"]);
    assert_eq!(names, vec!["First Steps".to_string()]);

    // The metric still exceeds the target, but the grant is at-most-once.
    let response = client.post(&check_url).await;
    let names = names_of(&response.json()["newly_earned"]);
    assert!(names.is_empty());

    let response = client
        .get(&format!("/users/{user_id}/gamification/profile"))
        .await;
    let profile = &response.json()["profile"];
    assert_eq!(profile["achievements"].as_array().unwrap().len(), 1);
    assert_eq!(profile["level"]["achievement_points"], 100);
}

#[tokio::test]
async fn test_badge_thresholds_and_no_reward() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "badges").await;

    // 2,500 points is exactly level 5 and exactly the "Point Hunter" bar.
    let response = client
        .post_json(
            &format!("/users/{user_id}/gamification/points"),
            &json!({ "points": 2500, "category": "social" }),
        )
        .await;
    assert_eq!(response.json()["level"]["current_level"], 5);

    let check_url = format!("/users/{user_id}/gamification/badges/check");
    let response = client.post(&check_url).await;
    response.assert_status(StatusCode::OK);
    let mut names = names_of(&response.json()["newly_earned"]);
    names.sort();
    assert_eq!(names, vec!["Novice".to_string(), "Point Hunter".to_string()]);

    // Idempotent, and badges award no points.
    let response = client.post(&check_url).await;
    assert!(response.json()["newly_earned"].as_array().unwrap().is_empty());
    let response = client
        .get(&format!("/users/{user_id}/gamification/profile"))
        .await;
    let profile = &response.json()["profile"];
    assert_eq!(profile["level"]["total_points"], 2500);
    assert_eq!(profile["badges"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_achievement_catalog_reports_progress() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "progress").await;

    // Three notes out of the ten "Note Taker" wants.
    for i in 0..3 {
        let response = client
            .post_json(
                &format!("/users/{user_id}/notes"),
                &json!({ "title": format!("note {i}"), "content": "body" }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = client
        .get(&format!("/users/{user_id}/gamification/achievements"))
        .await;
    response.assert_status(StatusCode::OK);
    let achievements = response.json()["achievements"].clone();
    let note_taker = achievements
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Note Taker")
        .expect("Note Taker is in the catalog")
        .clone();

    assert_eq!(note_taker["earned"], false);
    assert_eq!(note_taker["progress"], 3.0);
    assert_eq!(note_taker["progress_percentage"], 30.0);
}

#[tokio::test]
async fn test_level_progress_detail() {
    let Some(state) = common::try_state().await else {
        return;
    };
    let client = TestClient::new(state);
    let user_id = test_data::create_user(&client, "levelprog").await;

    client
        .post_json(
            &format!("/users/{user_id}/gamification/points"),
            &json!({ "points": 250, "category": "learning" }),
        )
        .await
        .assert_status(StatusCode::OK);

    let response = client
        .get(&format!("/users/{user_id}/gamification/level-progress"))
        .await;
    response.assert_status(StatusCode::OK);
    let body = response.json();
    let progress = &body["progress"];

    // Level 1 spans 100..400 cumulative points; 250 is halfway.
    assert_eq!(body["level_info"]["current_level"], 1);
    assert_eq!(progress["current_level_points"], 100);
    assert_eq!(progress["next_level_points"], 400);
    assert_eq!(progress["progress_in_level"], 150);
    assert_eq!(progress["points_needed_for_level"], 300);
    assert_eq!(progress["progress_percentage"], 50.0);
}
