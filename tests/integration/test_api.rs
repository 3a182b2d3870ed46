//! End-to-end tests for the ShapeLearn HTTP API.
//!
//! Each test binds a real listener on an ephemeral port and talks to it
//! over HTTP, the way the frontend does.

use std::net::TcpListener;
use std::time::Duration;

use serde_json::{json, Value};
use shapelearn_api::{
    create_router, AppState, OperationResponse, PracticeResponse, ServerConfig,
};
use shapelearn_core::{addition, OperationKind, ShapeCatalog, SkillLevel};

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Spawns the test server and returns its base URL.
async fn spawn_test_server(config: ServerConfig) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://{addr}"), handle)
}

fn seeded_config() -> ServerConfig {
    ServerConfig {
        practice_seed: Some(2024),
        ..ServerConfig::default()
    }
}

async fn post(client: &reqwest::Client, url: String, body: &Value) -> (u16, Value) {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .expect("Request failed");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Response was not JSON");
    (status, body)
}

// ============================================================================
// Shapes
// ============================================================================

/// The shapes endpoint serves exactly what the catalog builds.
#[tokio::test]
async fn test_all_shapes_match_catalog() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;

    let body: Value = reqwest::get(format!("{base}/api/shapes"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Response was not JSON");

    let expected = serde_json::to_value(ShapeCatalog::build()).expect("Catalog serializes");
    assert_eq!(body["success"], true);
    assert_eq!(body["total_numbers"], 21);
    assert_eq!(body["shapes"], expected);
}

/// Compound numbers carry tens and ones copies; round tens carry only tens.
#[tokio::test]
async fn test_compound_shape_components() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;

    let seventeen: Value = reqwest::get(format!("{base}/api/shapes/17"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Response was not JSON");
    let seven: Value = reqwest::get(format!("{base}/api/shapes/7"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Response was not JSON");

    let components = seventeen["shape"]["components"]
        .as_array()
        .expect("components array");
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["label"], "tens");
    assert_eq!(components[0]["shape"]["type"], "cylinder");
    assert_eq!(components[1]["label"], "ones");
    assert_eq!(components[1]["shape"], seven["shape"]);

    let twenty: Value = reqwest::get(format!("{base}/api/shapes/20"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Response was not JSON");
    assert_eq!(
        twenty["shape"]["components"]
            .as_array()
            .expect("components array")
            .len(),
        1
    );
}

/// Numbers 21-100 pass range validation but miss the catalog.
#[tokio::test]
async fn test_shape_status_codes() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;

    for (number, expected) in [("0", 200), ("20", 200), ("21", 500), ("100", 500), ("101", 400)] {
        let response = reqwest::get(format!("{base}/api/shapes/{number}"))
            .await
            .expect("Request failed");
        assert_eq!(response.status().as_u16(), expected, "number {number}");
    }
}

// ============================================================================
// Operations
// ============================================================================

/// The operation endpoint returns the same script the generator builds.
#[tokio::test]
async fn test_operation_round_trip() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/operation"))
        .json(&json!({"operation": "addition", "operand1": 4, "operand2": 6}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 200);

    let body: OperationResponse = response.json().await.expect("Unexpected body");
    assert!(body.success);
    assert_eq!(body.operation, OperationKind::Addition);
    assert_eq!(body.result, 10);
    assert_eq!(body.equation, "4 + 6 = 10");
    assert_eq!(body.transformation, addition(4, 6));
}

/// Invalid operation requests are rejected before any script is built.
#[tokio::test]
async fn test_operation_rejections() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let (status, body) = post(
        &client,
        format!("{base}/api/operation"),
        &json!({"operation": "subtraction", "operand1": 3, "operand2": 5}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    let (status, body) = post(
        &client,
        format!("{base}/api/operation"),
        &json!({"operation": "addition", "operand1": 15, "operand2": 15}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Result exceeds 20");
}

// ============================================================================
// Practice and progress
// ============================================================================

/// Practice problems come back within the tier's range.
#[tokio::test]
async fn test_practice_problems() {
    let (base, _handle) = spawn_test_server(seeded_config()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/practice"))
        .json(&json!({"skill_level": "intermediate", "operation_type": "subtraction", "count": 12}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 200);

    let body: PracticeResponse = response.json().await.expect("Unexpected body");
    assert_eq!(body.problems.len(), 12);
    assert_eq!(body.skill_level.as_deref(), Some("intermediate"));
    for problem in &body.problems {
        assert_eq!(problem.skill_level, SkillLevel::Intermediate);
        assert_eq!(problem.operation, OperationKind::Subtraction);
        assert!((2..=10).contains(&problem.operand1));
        assert!(problem.result >= 0);
    }
}

/// Answers fed back through the progress endpoint produce a report.
#[tokio::test]
async fn test_progress_promotes_fast_accurate_learner() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let attempts: Vec<Value> = (0..12)
        .map(|_| json!({"operation": "addition", "correct": true, "response_time": 4.0}))
        .collect();
    let (status, body) = post(
        &client,
        format!("{base}/api/progress"),
        &json!({ "attempts": attempts }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["progress"]["accuracy"], 1.0);
    assert_eq!(body["progress"]["next_skill_level"], "intermediate");
}

// ============================================================================
// Envelope
// ============================================================================

#[tokio::test]
async fn test_health_and_unknown_route() {
    let (base, _handle) = spawn_test_server(ServerConfig::default()).await;

    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Response was not JSON");
    assert_eq!(health["status"], "healthy");

    let response = reqwest::get(format!("{base}/nope"))
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Response was not JSON");
    assert_eq!(body["error"], "Endpoint not found");
}
