use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use lms_api::{config::Environment, state::ApiState};
use tower::ServiceExt;

/// Build a test `ApiState` against `TEST_DATABASE_URL`, running migrations
/// and seeding the default catalog.
///
/// Returns `None` (after printing a notice) when no test database is
/// configured, so tests can skip instead of failing on missing
/// infrastructure.
pub async fn try_state() -> Option<ApiState> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping DB-backed test");
        return None;
    };

    let pool = lms_db::create_pool(&database_url, 10)
        .await
        .expect("failed to connect to test database");
    lms_db::ensure_db_and_migrate(&database_url, &pool)
        .await
        .expect("failed to migrate test database");
    lms_db::catalog::ensure_default_catalog(&pool)
        .await
        .expect("failed to seed default catalog");

    Some(ApiState::new(pool, Environment::Development))
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(state: ApiState) -> Self {
        Self {
            router: lms_api::router::router().with_state(state),
        }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with no body
    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}

/// Test data helpers
pub mod test_data {
    use serde_json::Value;

    use super::{StatusCode, TestClient};

    /// Generate a unique username for test isolation
    pub fn unique_username(base: &str) -> String {
        let uuid = uuid::Uuid::new_v4();
        format!("{}_{}", base, &uuid.to_string()[..8])
    }

    /// Generate a unique email for test isolation
    pub fn unique_email(base: &str) -> String {
        let uuid = uuid::Uuid::new_v4();
        format!("{}+{}@example.com", base, &uuid.to_string()[..8])
    }

    /// Create a user through the API and return its id
    pub async fn create_user(client: &TestClient, base: &str) -> String {
        let response = client
            .post_json(
                "/users",
                &serde_json::json!({
                    "username": unique_username(base),
                    "email": unique_email(base),
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        body["user"]["id"]
            .as_str()
            .expect("created user has an id")
            .to_string()
    }
}
