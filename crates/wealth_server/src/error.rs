use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use wealth_core::SimulationError;

/// API-facing error type. `ScenarioNotFound`/`NoAssets`/`Cancelled` mirror
/// [`wealth_core::SimulationError`]'s variants 1:1 — the engine's error
/// taxonomy IS the API's for the run endpoint — plus the CRUD-only
/// variants a document store and request validation need on top.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Scenario has no accounts configured")]
    NoAssets,

    #[error("Simulation cancelled")]
    Cancelled,

    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    #[error("Invalid parameter: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Mutex lock error")]
    LockError,
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ApiError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ApiError::LockError
    }
}

/// The engine's error taxonomy has no notion of HTTP status codes or a
/// scenario id to interpolate into the message — the caller supplying
/// `scenario_id` (the handler, which already has it from the path) is
/// cheaper than threading it through `wealth_core`.
impl ApiError {
    pub fn from_simulation_error(err: SimulationError, scenario_id: &str) -> Self {
        match err {
            SimulationError::ScenarioNotFound => ApiError::ScenarioNotFound(scenario_id.to_string()),
            SimulationError::NoAssets => ApiError::NoAssets,
            SimulationError::Cancelled => ApiError::Cancelled,
            SimulationError::InvalidOverride(msg) => ApiError::InvalidOverride(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::ScenarioNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            ApiError::NoAssets | ApiError::InvalidOverride(_) | ApiError::ValidationError { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }

            ApiError::Cancelled => (StatusCode::CONFLICT, self.to_string()),

            ApiError::SerializationError(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            ApiError::DatabaseError(_) => {
                error!("database error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal database error".to_string(),
                )
            }

            ApiError::LockError => {
                error!("lock error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Helper type for API results
pub type ApiResult<T> = Result<T, ApiError>;
