use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced by the catalog aggregation engine
///
/// Variants carry owned strings rather than source errors so a single failure
/// can be logged, returned to the caller and delivered to a listener.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    #[error("None of the {attempted} candidates resolved ({failed} searches failed)")]
    ZeroCandidatesResolved { attempted: usize, failed: usize },
}

impl CatalogError {
    /// True when the session is missing or rejected and the user must sign in again
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CatalogError::Unauthorized(_))
    }

    /// Rank used to pick the surviving error when both sides of a join fail
    pub fn precedence(&self) -> u8 {
        match self {
            CatalogError::Unauthorized(_) => 6,
            CatalogError::Transport(_) => 5,
            CatalogError::Status { .. } => 4,
            CatalogError::Decode(_) => 3,
            CatalogError::MalformedRequest(_) => 2,
            CatalogError::Aggregation(_) => 1,
            CatalogError::ZeroCandidatesResolved { .. } => 0,
        }
    }

    /// Maps a non-2xx status into the matching error kind
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 401 {
            CatalogError::Unauthorized(body)
        } else {
            CatalogError::Status { status, body }
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return CatalogError::from_status(status.as_u16(), err.to_string());
        }

        if err.is_builder() {
            CatalogError::MalformedRequest(err.to_string())
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for CatalogError {
    fn from(err: tokio::task::JoinError) -> Self {
        CatalogError::Aggregation(err.to_string())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CatalogError::Transport(_) | CatalogError::Status { .. } | CatalogError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            CatalogError::ZeroCandidatesResolved { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Aggregation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
