use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::Display;
use thiserror::Error;

use crate::store::{EntityId, StoreError};

/// Failure kinds surfaced by the product operations.
///
/// Several `ProductError` variants share a kind; callers that only care
/// about the category (tests, transport mapping, log severity) match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InsufficientStock,
    Unexpected,
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with ID {0} not found.")]
    NotFound(EntityId),

    #[error("No products found.")]
    CatalogEmpty,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Insufficient stock for product with ID {id}. Current stock: {available}, requested: {requested}."
    )]
    InsufficientStock {
        id: EntityId,
        available: i32,
        requested: i32,
    },

    #[error("Unexpected store failure: {0}")]
    Unexpected(#[from] StoreError),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::NotFound(_) | ProductError::CatalogEmpty => ErrorKind::NotFound,
            ProductError::InvalidInput(_) => ErrorKind::InvalidInput,
            ProductError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            ProductError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Whether this is an expected domain outcome rather than a fault.
    pub fn is_domain(&self) -> bool {
        self.kind() != ErrorKind::Unexpected
    }

    /// Emit the single log event for a failed operation.
    ///
    /// Domain outcomes are logged at warn, anything unexpected at error.
    pub fn log(&self, operation: &'static str) {
        if self.is_domain() {
            tracing::warn!(operation, kind = %self.kind(), "{}", self);
        } else {
            tracing::error!(operation, kind = %self.kind(), error = ?self, "{}", self);
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) | ProductError::CatalogEmpty => {
                AppError::NotFound(err.to_string())
            }
            ProductError::InvalidInput(msg) => AppError::BadRequest(msg),
            ProductError::InsufficientStock { .. } => AppError::Conflict(err.to_string()),
            // Store details stay in the logs
            ProductError::Unexpected(_) => AppError::InternalServerError(
                "An unexpected error occurred while processing the product request".to_string(),
            ),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
