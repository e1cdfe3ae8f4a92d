use axum::{
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use directory_config::RUNNING_IN_DEBUG_MODE;
use directory_views::{AdminError, admin::DELETE_PROMPT};
use error_stack::Report;
use serde::Serialize;

/// JSON request and response body. Invalid request bodies are rejected
/// with [ApiError], so body parsing details are visible only in debug mode.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    /// Text which the client should show to the user.
    prompt: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            prompt: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        tracing::debug!("Request body rejected: {}", value.body_text());
        Self::new(
            value.status(),
            format!("Invalid request body: {}", value.body_text()),
        )
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        Self::new(status, status.to_string())
    }
}

impl From<Report<AdminError>> for ApiError {
    #[track_caller]
    fn from(value: Report<AdminError>) -> Self {
        let error = *value.current_context();
        match error {
            AdminError::Busy => {
                tracing::warn!("{:?}", value);
                Self::new(StatusCode::CONFLICT, error.to_string())
            }
            AdminError::UnknownProfile => Self::new(StatusCode::NOT_FOUND, error.to_string()),
            AdminError::Interrupted => {
                tracing::error!("{:?}", value);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
            AdminError::ConfirmationRequired => Self {
                status: StatusCode::PRECONDITION_REQUIRED,
                message: error.to_string(),
                prompt: Some(DELETE_PROMPT),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut json_error = if RUNNING_IN_DEBUG_MODE.value() {
            serde_json::json!({
                "status": self.status.as_u16(),
                "status_message": self.status.to_string(),
                "message": self.message,
            })
        } else {
            serde_json::json!({
                "status": self.status.as_u16(),
            })
        };

        if let Some(prompt) = self.prompt {
            json_error["prompt"] = prompt.into();
        }

        (self.status, axum::Json(json_error)).into_response()
    }
}
