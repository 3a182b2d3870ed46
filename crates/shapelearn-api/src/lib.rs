//! ShapeLearn API
//!
//! HTTP surface over the ShapeLearn core: shape catalog, transformation
//! scripts, practice problems and progress analysis.

pub mod api;
pub mod config;
pub mod error;

pub use api::{
    create_router, AppState, ErrorResponse, HealthResponse, OperationResponse, PracticeRequest,
    PracticeResponse, ProgressRequest, ProgressResponse, SERVICE_NAME,
};
pub use config::ServerConfig;
pub use error::{Result, ServerError};
