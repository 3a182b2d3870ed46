//! HTTP API endpoints for ShapeLearn.
//!
//! # Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /api/shapes` - All shape descriptors (0-20)
//! - `GET /api/shapes/:number` - One shape descriptor
//! - `POST /api/operation` - Result and transformation script for `a + b` / `a - b`
//! - `POST /api/practice` - Generated practice problems
//! - `POST /api/progress` - Progress analysis over answered problems
//!
//! Every response is a JSON envelope. Failures carry
//! `{"success": false, "error": "..."}`.
//!
//! # Example
//!
//! ```no_run
//! use shapelearn_api::{create_router, AppState, ServerConfig};
//!
//! # async fn example() {
//! let router = create_router(AppState::new(ServerConfig::default()));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapelearn_core::{
    analyze, generate_problems, transformation, AttemptRecord, OperationKind, PracticeProblem,
    ProgressReport, ShapeCatalog, ShapeDescriptor, SkillLevel, TransformationScript,
    DEFAULT_PRACTICE_COUNT, MAX_CATALOG_NUMBER,
};
use tokio::sync::Mutex;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyCors, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::ServerConfig;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "ShapeLearn Math API";

/// Highest number `GET /api/shapes/:number` accepts before the catalog lookup.
const MAX_REQUESTED_NUMBER: i64 = 100;

/// Largest operand, and largest addition result, `POST /api/operation` accepts.
const MAX_OPERAND: i64 = MAX_CATALOG_NUMBER as i64;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
}

#[derive(Debug, Serialize)]
struct ShapesResponse<'a> {
    success: bool,
    shapes: &'a ShapeCatalog,
    total_numbers: usize,
}

#[derive(Debug, Serialize)]
struct ShapeResponse<'a> {
    success: bool,
    number: i64,
    shape: &'a ShapeDescriptor,
}

/// Response body for `POST /api/operation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResponse {
    /// Always `true`.
    pub success: bool,
    /// The operation performed.
    pub operation: OperationKind,
    /// First operand.
    pub operand1: i32,
    /// Second operand.
    pub operand2: i32,
    /// Result of the operation.
    pub result: i32,
    /// Animation script for the renderer.
    pub transformation: TransformationScript,
    /// Solved equation, e.g. `3 + 7 = 10`.
    pub equation: String,
}

#[allow(clippy::unnecessary_wraps)]
fn default_skill_label() -> Option<String> {
    Some(SkillLevel::default().as_str().to_string())
}

#[allow(clippy::unnecessary_wraps)]
fn default_operation_label() -> Option<String> {
    Some(OperationKind::Addition.as_str().to_string())
}

#[allow(clippy::cast_possible_wrap)]
const fn default_count() -> i64 {
    DEFAULT_PRACTICE_COUNT as i64
}

/// Request body for `POST /api/practice`. Every field is optional.
///
/// An absent label takes its default, while an explicit `null` is kept as
/// `None` and resolved like any other unknown label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeRequest {
    /// Skill tier label; unknown or null labels fall back to beginner.
    #[serde(default = "default_skill_label")]
    pub skill_level: Option<String>,
    /// `addition`; anything else, including null, produces subtraction problems.
    #[serde(default = "default_operation_label")]
    pub operation_type: Option<String>,
    /// Problems to generate. Negative counts produce none.
    #[serde(default = "default_count")]
    pub count: i64,
}

/// Response body for `POST /api/practice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeResponse {
    /// Always `true`.
    pub success: bool,
    /// The generated problems.
    pub problems: Vec<PracticeProblem>,
    /// Skill level label as requested.
    pub skill_level: Option<String>,
    /// Operation label as requested.
    pub operation_type: Option<String>,
}

/// Request body for `POST /api/progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRequest {
    /// Answered problems to analyze.
    #[serde(default)]
    pub attempts: Vec<AttemptRecord>,
}

/// Response body for `POST /api/progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Always `true`.
    pub success: bool,
    /// The analysis, or the no-data sentinel.
    pub progress: ProgressReport,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
///
/// The catalog is built once and only read afterwards. The practice random
/// source is the only mutable piece.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Immutable shape catalog.
    pub catalog: Arc<ShapeCatalog>,
    /// Random source for practice problems.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Creates the state, building the catalog and seeding the random source
    /// from `practice_seed` when set.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let rng = config
            .practice_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            config,
            catalog: Arc::new(ShapeCatalog::build()),
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// Input failed validation.
    BadRequest(String),
    /// No such route.
    NotFound,
    /// Known route, wrong method.
    MethodNotAllowed,
    /// Unexpected failure in core logic.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound => (StatusCode::NOT_FOUND, "Endpoint not found".to_string()),
            Self::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        error_response(status, message)
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    let body = Json(ErrorResponse {
        success: false,
        error,
    });
    (status, body).into_response()
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all endpoints.
///
/// The router carries:
/// - `/health` and the API routes under `/api`
/// - a JSON 404 fallback
/// - CORS for the configured origins
/// - request tracing
/// - a panic guard rendering a generic 500
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AnyCors)
        .allow_headers(AnyCors);

    let api_routes = Router::new()
        .route("/shapes", get(handle_list_shapes).fallback(handle_wrong_method))
        .route("/shapes/:number", get(handle_get_shape).fallback(handle_wrong_method))
        .route("/operation", post(handle_operation).fallback(handle_wrong_method))
        .route("/practice", post(handle_practice).fallback(handle_wrong_method))
        .route("/progress", post(handle_progress).fallback(handle_wrong_method));

    Router::new()
        .route("/health", get(handle_health).fallback(handle_wrong_method))
        .nest("/api", api_routes)
        .fallback(handle_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for `GET /api/shapes`.
async fn handle_list_shapes(State(state): State<Arc<AppState>>) -> Response {
    Json(ShapesResponse {
        success: true,
        shapes: &state.catalog,
        total_numbers: state.catalog.len(),
    })
    .into_response()
}

/// Handler for `GET /api/shapes/:number`.
///
/// Numbers up to 100 pass validation, but the catalog stops at 20, so
/// 21-100 surface as a 500 carrying the lookup error.
async fn handle_get_shape(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Response, ApiError> {
    let number = parse_path_number(&raw).ok_or(ApiError::NotFound)?;

    if !(0..=MAX_REQUESTED_NUMBER).contains(&number) {
        warn!(number, "Rejected shape request outside 0-100");
        return Err(ApiError::BadRequest(format!(
            "Number must be between 0 and {MAX_REQUESTED_NUMBER}"
        )));
    }

    let shape = state.catalog.lookup(number).map_err(|e| {
        error!(number, error = %e, "Shape lookup failed");
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(ShapeResponse {
        success: true,
        number,
        shape,
    })
    .into_response())
}

/// Parses a decimal path segment. A leading `+` does not match the route.
fn parse_path_number(raw: &str) -> Option<i64> {
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}

/// Handler for `POST /api/operation`.
async fn handle_operation(body: Bytes) -> Result<Json<OperationResponse>, ApiError> {
    let (operation, operand1, operand2) = parse_operation(&body).map_err(|e| {
        warn!(error = ?e, "Rejected operation request");
        e
    })?;

    let script = transformation(operation, operand1, operand2);
    let result = script.result;

    info!(
        operation = %operation,
        operand1,
        operand2,
        result,
        is_complementary = script.is_complementary,
        "Generated transformation"
    );

    Ok(Json(OperationResponse {
        success: true,
        operation,
        operand1,
        operand2,
        result,
        transformation: script,
        equation: format!("{operand1} {} {operand2} = {result}", operation.symbol()),
    }))
}

/// Validates an operation request body.
///
/// Checks run in order: body present, operation name, integer operands,
/// operand range, then the per-operation result rule.
fn parse_operation(body: &[u8]) -> Result<(OperationKind, i32, i32), ApiError> {
    let data = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => map,
        _ => return Err(ApiError::BadRequest("No JSON data provided".to_string())),
    };

    let operation = data
        .get("operation")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<OperationKind>().ok())
        .ok_or_else(|| {
            ApiError::BadRequest("Operation must be 'addition' or 'subtraction'".to_string())
        })?;

    let (Some(a), Some(b)) = (
        data.get("operand1").and_then(Value::as_i64),
        data.get("operand2").and_then(Value::as_i64),
    ) else {
        return Err(ApiError::BadRequest("Operands must be integers".to_string()));
    };

    let in_range = |n: i64| (0..=MAX_OPERAND).contains(&n);
    if !in_range(a) || !in_range(b) {
        return Err(ApiError::BadRequest(format!("Numbers must be between 0 and {MAX_OPERAND}")));
    }

    match operation {
        OperationKind::Addition if a + b > MAX_OPERAND => {
            return Err(ApiError::BadRequest(format!("Result exceeds {MAX_OPERAND}")));
        }
        OperationKind::Subtraction if b > a => {
            return Err(ApiError::BadRequest(
                "Cannot subtract larger number from smaller (negative results are not supported)"
                    .to_string(),
            ));
        }
        _ => {}
    }

    // Both operands are within 0..=20 here.
    let operand = |n: i64| i32::try_from(n).unwrap_or_default();
    Ok((operation, operand(a), operand(b)))
}

/// Handler for `POST /api/practice`.
///
/// A body that is not a valid practice request is a 500, matching the
/// behavior clients already rely on.
async fn handle_practice(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PracticeResponse>, ApiError> {
    let request: PracticeRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Malformed practice request");
        ApiError::Internal(e.to_string())
    })?;

    let count = usize::try_from(request.count).unwrap_or(0);
    if count > state.config.max_practice_count {
        warn!(count, max = state.config.max_practice_count, "Practice count too large");
        return Err(ApiError::BadRequest(format!(
            "count must be at most {}",
            state.config.max_practice_count
        )));
    }

    let skill_level = request
        .skill_level
        .as_deref()
        .map_or(SkillLevel::Beginner, SkillLevel::from_label);
    let operation = match request.operation_type.as_deref() {
        Some("addition") => OperationKind::Addition,
        _ => OperationKind::Subtraction,
    };

    let problems = {
        let mut rng = state.rng.lock().await;
        generate_problems(skill_level, operation, count, &mut *rng)
    };

    info!(
        skill_level = %skill_level,
        operation = %operation,
        count = problems.len(),
        "Generated practice problems"
    );

    Ok(Json(PracticeResponse {
        success: true,
        problems,
        skill_level: request.skill_level,
        operation_type: request.operation_type,
    }))
}

/// Handler for `POST /api/progress`.
async fn handle_progress(body: Bytes) -> Result<Json<ProgressResponse>, ApiError> {
    let request: ProgressRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected progress request");
        ApiError::BadRequest(format!("Invalid progress data: {e}"))
    })?;

    let progress = analyze(&request.attempts);
    info!(attempts = request.attempts.len(), "Analyzed progress");

    Ok(Json(ProgressResponse {
        success: true,
        progress,
    }))
}

/// Fallback for unmatched routes.
async fn handle_not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for a known route hit with an unsupported method.
async fn handle_wrong_method() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Renders a panic inside a handler as a generic 500.
#[allow(clippy::needless_pass_by_value)]
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================================
// Tests
// ============================================================================
