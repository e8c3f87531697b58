//! Response envelopes and the error presentation strategy.

use crate::config::Presentation;
use crate::error::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{message, status}` body used by root, delete, seed and soft errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub message: String,
    pub status: String,
}

impl Message {
    fn new(message: impl Into<String>, status: &str) -> Self {
        Self {
            message: message.into(),
            status: status.to_string(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, "success")
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, "info")
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, "error")
    }
}

impl Presentation {
    /// Status code for a successful create.
    pub fn created_status(self) -> StatusCode {
        match self {
            Presentation::Soft => StatusCode::OK,
            Presentation::Structured => StatusCode::CREATED,
        }
    }

    /// Render an error. Under `Soft`, not-found becomes a 200 envelope; every
    /// other error keeps its structured status.
    pub fn reject(self, err: AppError) -> Response {
        match self {
            Presentation::Soft if err.is_not_found() => {
                (StatusCode::OK, Json(Message::error(err.detail()))).into_response()
            }
            _ => err.into_response(),
        }
    }

    /// Render a handler result.
    pub fn respond<T: IntoResponse>(self, result: Result<T, AppError>) -> Response {
        match result {
            Ok(body) => body.into_response(),
            Err(err) => self.reject(err),
        }
    }
}
