use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use remarks_core::audience::{owner_lookup_error_to_status_code, OwnerLookupError};
use remarks_core::comment::{comment_error_to_status_code, CommentError};
use remarks_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::service::ServiceError;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            err.status_code()
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<CommentError>() {
            comment_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<OwnerLookupError>() {
            owner_lookup_error_to_status_code(err)
        } else {
            500
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
