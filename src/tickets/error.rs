use axum::{response::IntoResponse, Json};

use crate::shared::db::ConnectionFailure;

#[derive(Debug, thiserror::Error)]
pub enum TicketsError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("{0} not found")]
    NotFound(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Write error: {0}")]
    Write(String),
    #[error("Query error: {0}")]
    Query(String),
}

impl From<ConnectionFailure> for TicketsError {
    fn from(err: ConnectionFailure) -> Self {
        Self::Connection(err.to_string())
    }
}

impl IntoResponse for TicketsError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        // Failure detail stays in the logs; the body carries the stable
        // wording clients match on.
        let (status, message) = match &self {
            Self::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON".to_string()),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::Connection(_) | Self::Write(_) | Self::Query(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
