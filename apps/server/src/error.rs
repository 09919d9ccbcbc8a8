use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use walletbook_core::errors::Error as CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    /// Request payload passed deserialization but is not acceptable.
    #[error("{0}")]
    Validation(String),
    /// An extractor refused the request before it reached a handler.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Core(CoreError::NotFound { resource, id }) => {
                let mut details = serde_json::Map::new();
                details.insert(resource.as_str().to_string(), json!(id));
                (
                    StatusCode::NOT_FOUND,
                    ErrorBody {
                        message: "Not Found".to_string(),
                        details: Some(Value::Object(details)),
                    },
                )
            }
            ApiError::Core(CoreError::Validation(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorBody::new(e.to_string()))
            }
            ApiError::Validation(reason) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorBody::new(reason.clone()))
            }
            ApiError::Rejected { status, message } => (*status, ErrorBody::new(message.clone())),
            ApiError::Core(_) => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal Server Error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
