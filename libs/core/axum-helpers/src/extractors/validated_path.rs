//! Path extractor with validation, for routes carrying several parameters.

use super::validation_details;
use crate::errors::{AppError, ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes all path parameters into `T` and runs `T::validate`.
///
/// Parse failures answer 400 `INVALID_PATH`; validation failures answer
/// 400 `VALIDATION_ERROR` with per-field details, same as [`ValidatedJson`].
///
/// [`ValidatedJson`]: super::ValidatedJson
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(data) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::PathRejection(e).into_response())?;

        data.validate().map_err(|e| {
            let error_response = ErrorResponse::new(
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message(),
            )
            .with_details(validation_details(&e));

            (StatusCode::BAD_REQUEST, axum::Json(error_response)).into_response()
        })?;

        Ok(ValidatedPath(data))
    }
}
