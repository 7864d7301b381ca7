use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Domain error taxonomy. Every variant except the infrastructure ones
/// is recovered at the handler boundary into a redirect with a flash
/// notice; only `Database`, `Template` and `Internal` reach the client
/// as HTTP errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("that username is already taken")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("please log in first")]
    NotAuthenticated,

    #[error("admin access required")]
    NotAuthorized,

    #[error("no such record")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors a handler turns into a redirect + flash notice
    /// instead of an HTTP error status.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(e) => {
                error!(error = %e, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            AppError::Template(e) => {
                error!(error = %e, "template rendering failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            // Handlers and guards convert these before they get here;
            // falling through means a handler forgot to.
            other => (StatusCode::BAD_REQUEST, other.to_string()).into_response(),
        }
    }
}
