use std::fmt::Display;

use rouille::Response;
use serde::{Deserialize, Serialize};

use crate::content::error::ContentError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// Carries the rejected method
    MethodNotAllowed(String),
    Internal {
        message: String,
        details: Option<String>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::MixNotFound(slug) => ApiError::NotFound(format!("mix {slug} not found")),

            ContentError::Fs(_)
            | ContentError::MissingRoot(_)
            | ContentError::DuplicateSlug { .. }
            | ContentError::Internal(_) => ApiError::internal("internal server error", err),
        }
    }
}

impl ApiError {
    pub fn internal(message: &str, cause: impl Display) -> Self {
        ApiError::Internal {
            message: message.to_string(),
            details: Some(cause.to_string()),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::Internal { .. } => 500,
        }
    }

    /// Internal details are only exposed in development mode
    pub fn into_response(self, development: bool) -> Response {
        let status = self.status_code();

        match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => body(msg, None, status),

            ApiError::MethodNotAllowed(method) => {
                body(format!("Method {method} not allowed"), None, status)
                    .with_additional_header("Allow", "GET")
            }

            ApiError::Internal { message, details } => {
                log::error!("{message}: {}", details.as_deref().unwrap_or("no details"));
                body(message, details.filter(|_| development), status)
            }
        }
    }
}

fn body(error: String, details: Option<String>, status: u16) -> Response {
    Response::json(&ErrorBody { error, details }).with_status_code(status)
}
