use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Neo4j error: {0}")]
    Store(String),

    #[error("Neo4j query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Relationship already exists: {follower_id} -> {followed_id}")]
    DuplicateRelationship { follower_id: i64, followed_id: i64 },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl GraphError {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::Store(_) => "store",
            GraphError::Timeout(_) => "timeout",
            GraphError::DuplicateRelationship { .. } => "duplicate",
            GraphError::UserNotFound(_) => "user_not_found",
            GraphError::InvalidInput(_) => "invalid_input",
            GraphError::NotFound(_) => "not_found",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for GraphError {
    fn error_response(&self) -> HttpResponse {
        // Check-follow callers match on the plain-text body
        if let GraphError::NotFound(msg) = self {
            return HttpResponse::NotFound().body(msg.clone());
        }

        let code = self.status_code();
        HttpResponse::build(code).json(ErrorResponse {
            error: self.to_string(),
            code: code.as_u16(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GraphError::DuplicateRelationship { .. }
            | GraphError::UserNotFound(_)
            | GraphError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GraphError::NotFound(_) => StatusCode::NOT_FOUND,
            GraphError::Store(_) | GraphError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        GraphError::Store(err.to_string())
    }
}

impl From<neo4rs::DeError> for GraphError {
    fn from(err: neo4rs::DeError) -> Self {
        GraphError::Store(format!("Unexpected row shape: {}", err))
    }
}
