use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use clubhouse_core::authorization::decision::{AUTHENTICATION_REQUIRED, INSUFFICIENT_PRIVILEGES};
use clubhouse_core::authorization::{CatalogError, ClubId, Denial, StatusClass, UserId};
use thiserror::Error;

use crate::services::directory::BookingId;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum AppError {
    #[error("{}", AUTHENTICATION_REQUIRED)]
    Unauthenticated,

    #[error("{}", INSUFFICIENT_PRIVILEGES)]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Club not found: {0}")]
    ClubNotFound(ClubId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn get_error_msg(&self) -> (StatusCode, String) {
        let status = match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ClubNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BookingNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownRole(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string())
    }
}

/// Only the status class reaches the client; the denial reason stays in the logs
impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial.status {
            StatusClass::Unauthenticated => AppError::Unauthenticated,
            StatusClass::Forbidden => AppError::Forbidden,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::InvalidInput(e.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        if let Some(catalog_error) = e.downcast_ref::<CatalogError>() {
            return catalog_error.clone().into();
        }
        AppError::InternalServerError(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.get_error_msg();
        let body = serde_json::json!({ "error": true, "message": body });
        (status, Json(body)).into_response()
    }
}
