mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use helpers::TestApp;

fn john() -> serde_json::Value {
    json!({"username": "john", "email": "john@x.com", "password": "secret1"})
}

fn leg_day() -> serde_json::Value {
    json!({
        "userId": "u1",
        "name": "Leg Day",
        "date": "2024-01-01",
        "exercises": []
    })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(None).await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_signup_twice_conflicts() {
    let app = TestApp::new(None).await;

    let (status, body) = app.post("/user/signup", john()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "john");
    assert_eq!(body["user"]["email"], "john@x.com");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = app
        .post(
            "/user/signup",
            json!({"username": "other", "email": "john@x.com", "password": "different"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_exists");
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new(None).await;
    let (_, signup) = app.post("/user/signup", john()).await;

    let (status, body) = app
        .post("/user/login", json!({"email": "john@x.com", "password": "secret1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], signup["user"]);

    let (status, wrong_password) = app
        .post("/user/login", json!({"email": "john@x.com", "password": "nope"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = app
        .post("/user/login", json!({"email": "jane@x.com", "password": "secret1"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = TestApp::new(None).await;

    let (status, body) = app
        .post("/user/signup", json!({"username": "john", "email": "nope"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    let errors = body["errors"].as_array().unwrap();
    let paths: Vec<&str> = errors.iter().map(|e| e["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["body.email", "body.password"]);
    assert_eq!(errors[0]["errorCode"], "format");
    assert_eq!(errors[1]["errorCode"], "required");
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new(None).await;
    let (_, signup) = app.post("/user/signup", john()).await;
    let token = signup["token"].as_str().unwrap();

    let (status, body) = app.get_with_token("/user/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, signup["user"]);

    let (status, body) = app.get("/user/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_auth");

    let (status, body) = app.get_with_token("/user/me", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_workout_lifecycle() {
    let app = TestApp::new(None).await;

    let (status, created) = app.post("/workouts", leg_day()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["exercises"], json!([]));
    assert_eq!(created["userId"], "u1");
    assert!(created.get("revision").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = app.get(&format!("/workouts/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = app.delete(&format!("/workouts/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = app.delete(&format!("/workouts/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = app.get(&format!("/workouts/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workout_partial_update() {
    let app = TestApp::new(None).await;
    let (_, created) = app.post("/workouts", leg_day()).await;
    let uri = format!("/workouts/{}", created["id"].as_str().unwrap());

    let (status, updated) = app
        .put(
            &uri,
            json!({"exercises": [{"name": "Squat", "sets": 5, "reps": 5, "weight": 100}]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Leg Day");
    assert_eq!(updated["date"], "2024-01-01");
    assert_eq!(updated["exercises"][0]["name"], "Squat");

    let (status, body) = app.put(&uri, json!({"date": "yesterday"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "body.date");

    let (status, _) = app.put("/workouts/missing", json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_workouts_by_user() {
    let app = TestApp::new(None).await;
    app.post("/workouts", leg_day()).await;
    app.post(
        "/workouts",
        json!({"userId": "u2", "name": "Other", "date": "2024-01-02"}),
    )
    .await;

    let (status, body) = app.get("/workouts?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    let workouts = body.as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["name"], "Leg Day");

    let (status, body) = app.get("/workouts").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "query.userId");
}

#[tokio::test]
async fn test_create_workout_rejects_bad_body() {
    let app = TestApp::new(None).await;

    let (status, body) = app
        .post(
            "/workouts",
            json!({
                "userId": "u1",
                "date": "2024-01-01",
                "exercises": [{"name": "Squat", "sets": -1, "reps": 5}]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let paths: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["body.name", "body.exercises[0].sets"]);

    let (status, _) = app.send(Method::POST, "/workouts", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_workout_stats() {
    let app = TestApp::new(Some("Roughly 250 calories")).await;
    let (_, created) = app
        .post(
            "/workouts",
            json!({
                "userId": "u1",
                "name": "Push Day",
                "date": "2024-01-01",
                "exercises": [
                    {"name": "Bench Press", "sets": 3, "reps": 10, "weight": 100},
                    {"name": "Row", "sets": 2, "reps": 8, "weight": 50}
                ]
            }),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, stats) = app.get(&format!("/workouts/{}/stats", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["workoutId"], id);
    assert_eq!(stats["totalSets"], 5);
    assert_eq!(stats["totalReps"], 46);
    assert_eq!(stats["totalWeight"], 3800.0);
    assert_eq!(stats["averageWeightPerExercise"], 1900.0);
    assert_eq!(stats["intensity"], "Medium");
    assert_eq!(stats["estimatedCaloriesBurned"], 250.0);
}

#[tokio::test]
async fn test_stats_survive_completion_failure() {
    let app = TestApp::new(None).await;
    let (_, workout) = app
        .post(
            "/workouts",
            json!({
                "userId": "u1",
                "name": "Push Day",
                "date": "2024-01-01",
                "exercises": [{"name": "Bench Press", "sets": 3, "reps": 10, "weight": 100}]
            }),
        )
        .await;
    let (_, meal) = app
        .post(
            "/meals",
            json!({
                "userId": "u1",
                "name": "Lunch",
                "date": "2024-01-01",
                "foods": [
                    {"name": "Rice", "quantity": 1, "calories": 200},
                    {"name": "Chicken", "quantity": 1, "calories": 165}
                ]
            }),
        )
        .await;

    let (status, stats) = app
        .get(&format!("/workouts/{}/stats", workout["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["estimatedCaloriesBurned"], 0.0);

    let (status, stats) = app
        .get(&format!("/meals/{}/stats", meal["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalCalories"], 365.0);
    assert_eq!(stats["estimatedCalories"], 365.0);

    let (status, _) = app.get("/meals/missing/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_meal_lifecycle() {
    let app = TestApp::new(Some("400")).await;

    let (status, created) = app
        .post(
            "/meals",
            json!({
                "userId": "u1",
                "name": "Breakfast",
                "description": "Before the gym",
                "date": "2024-01-01",
                "foods": [{"name": "Oats", "quantity": 1, "calories": 150}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["description"], "Before the gym");
    let uri = format!("/meals/{}", created["id"].as_str().unwrap());

    let (status, updated) = app.put(&uri, json!({"name": "Brunch"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Brunch");
    assert_eq!(updated["foods"], created["foods"]);

    let (_, stats) = app.get(&format!("{}/stats", uri)).await;
    assert_eq!(stats["totalCalories"], 150.0);
    assert_eq!(stats["estimatedCalories"], 400.0);

    let (status, list) = app.get("/meals?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_exercise_is_rejected() {
    let app = TestApp::new(Some("300")).await;

    let (status, body) = app
        .post(
            "/workouts",
            json!({
                "userId": "u1",
                "name": "Leg Day",
                "date": "2024-01-01",
                "exercises": [{
                    "name": "Squat",
                    "sets": 4000000000i64,
                    "reps": 4000000000i64,
                    "weight": 1
                }]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors[0]["path"], "body.exercises[0].sets");
    assert_eq!(errors[0]["errorCode"], "maximum");
    assert_eq!(errors[1]["path"], "body.exercises[0].reps");

    let (_, list) = app.get("/workouts?userId=u1").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_stats_at_upper_bounds() {
    let app = TestApp::new(None).await;
    let (status, created) = app
        .post(
            "/workouts",
            json!({
                "userId": "u1",
                "name": "Max Day",
                "date": "2024-01-01",
                "exercises": [
                    {"name": "Squat", "sets": 10000, "reps": 10000, "weight": 10000}
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = app
        .get(&format!("/workouts/{}/stats", created["id"].as_str().unwrap()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalReps"], 100_000_000);
    assert_eq!(stats["totalWeight"], 1e12);
    assert_eq!(stats["intensity"], "High");
}

#[tokio::test]
async fn test_repeated_user_id_gets_structured_error() {
    let app = TestApp::new(None).await;

    for uri in ["/workouts?userId=a&userId=b", "/meals?userId=a&userId=b"] {
        let (status, body) = app.get(uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(body["errors"][0]["path"], "query");
        assert_eq!(body["errors"][0]["errorCode"], "type");
    }
}
