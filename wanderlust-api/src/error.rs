use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wanderlust_booking::BookingError;
use wanderlust_catalog::CatalogError;
use wanderlust_core::ValidationErrors;
use wanderlust_store::StoreError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(ValidationErrors),
    BadRequest(String),
    NotFoundError(String),
    ConflictError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": errors.to_string(), "fields": errors }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationError(errors)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::NotFoundError(err.to_string()),
            CatalogError::Validation(errors) => Self::ValidationError(errors),
            other => Self::Anyhow(other.into()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::PackageNotFound(_) | BookingError::NotFound(_) => Self::NotFoundError(err.to_string()),
            BookingError::InvalidAddOn { .. } => Self::BadRequest(err.to_string()),
            BookingError::Validation(errors) => Self::ValidationError(errors),
            BookingError::InvalidTransition { .. } => Self::ConflictError(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Anyhow(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
