use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::domains::blog::BlogError;
use crate::domains::users::UserError;

pub const INVALID_BODY: &str = "Invalid body.";
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// `{"message": ...}`
#[derive(Debug, Serialize)]
pub struct ResponseMsg {
    pub message: String,
}

impl ResponseMsg {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self { message: message.into() })
    }
}

/// `{"message": ..., "data": ...}`
#[derive(Debug, Serialize)]
pub struct ResponseData<T> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ResponseData<T> {
    pub fn new(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            message: message.into(),
            data,
        })
    }
}

/// Handler error, rendered as `{"message": ...}` or `{"message": ..., "error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_BODY).with_error(error)
    }

    /// Map a blog error for the given endpoint.
    pub fn blog(err: BlogError, action: BlogAction) -> Self {
        match err {
            BlogError::Validation(detail) => Self::bad_request(detail),
            BlogError::NotFound => Self::new(StatusCode::NOT_FOUND, "Blog not found."),
            BlogError::Forbidden => Self::new(StatusCode::FORBIDDEN, action.forbidden_message()),
            BlogError::Conflict(detail) => {
                Self::new(StatusCode::CONFLICT, action.failure_message()).with_error(detail)
            }
            BlogError::Store(e) => {
                error!(error = %e, "Blog store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, action.failure_message())
                    .with_error(e.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(detail) => Self::bad_request(detail),
            UserError::Conflict => Self::new(StatusCode::CONFLICT, "User already exists"),
            UserError::UserNotFound => Self::new(StatusCode::NOT_FOUND, INVALID_CREDENTIALS),
            UserError::InvalidCredentials => Self::new(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS),
            UserError::Store(e) => {
                error!(error = %e, "User store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
                    .with_error(e.to_string())
            }
            UserError::Internal(detail) => {
                error!(error = %detail, "User service failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
                    .with_error(detail)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            message: self.message,
            error: self.error,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Which endpoint an error came from; picks the client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogAction {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl BlogAction {
    pub fn failure_message(self) -> &'static str {
        match self {
            BlogAction::List => "Failed to get all blogs.",
            BlogAction::Get => "Failed to get blog.",
            BlogAction::Create => "Failed to create blog.",
            BlogAction::Update => "Failed to update blog.",
            BlogAction::Delete => "Failed to delete blog.",
        }
    }

    pub fn forbidden_message(self) -> &'static str {
        match self {
            BlogAction::Delete => "You are not authorized to delete this blog.",
            _ => "You are not authorized to update this blog.",
        }
    }
}
