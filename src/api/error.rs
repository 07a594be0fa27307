use crate::application::{ApplicationError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self.0 {
            ApplicationError::TitleNotFound => "TITLE_NOT_FOUND",
            ApplicationError::ActiveLoanNotFound => "ACTIVE_LOAN_NOT_FOUND",
            ApplicationError::NoCopiesAvailable => "NO_COPIES_AVAILABLE",
            ApplicationError::AlreadyBorrowed => "ALREADY_BORROWED",
            ApplicationError::DuplicateIsbn(_) => "DUPLICATE_ISBN",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::InventoryCorrupted { .. } => "INVENTORY_CORRUPTED",
            ApplicationError::StoreError(_) => "STORE_ERROR",
            ApplicationError::CoverStoreError(_) => "COVER_STORE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();

        // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        let message = match self.0.kind() {
            ErrorKind::Internal => {
                match std::error::Error::source(&self.0) {
                    Some(source) => tracing::error!("{}: {}", self.0, source),
                    None => tracing::error!("{}", self.0),
                }
                "An unexpected error occurred".to_string()
            }
            _ => self.0.to_string(),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
