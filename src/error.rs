use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 批量请求中某一笔结构不合法，整批拒绝
    #[error("Invalid data at index {index}: Missing required fields (award_id, award, emp_id)")]
    InvalidBatchEntry {
        index: usize,
        entry: serde_json::Value,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            log::warn!("Unique constraint violated: {detail}");
            return AppError::Conflict("Record already exists".to_string());
        }
        match err {
            DbErr::ConnectionAcquire(e) => {
                log::error!("Database connection unavailable: {e}");
                AppError::ServiceUnavailable("Database unavailable".to_string())
            }
            DbErr::Conn(e) => {
                log::error!("Database connection error: {e}");
                AppError::ServiceUnavailable("Database unavailable".to_string())
            }
            DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
            other => AppError::DatabaseError(other),
        }
    }
}

impl AppError {
    /// 对外暴露的错误码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBatchEntry { .. } => {
                "VALIDATION_ERROR"
            }
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBatchEntry { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::InvalidBatchEntry { index, .. } => {
                log::warn!("Invalid batch entry at index {index}");
                self.to_string()
            }
            AppError::Conflict(msg) => {
                log::warn!("Conflict: {msg}");
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::ServiceUnavailable(msg) => {
                log::warn!("Service unavailable: {msg}");
                msg.clone()
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            _ => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
        };

        let mut body = json!({
            "success": false,
            "error": message,
            "code": self.code(),
        });
        if let AppError::InvalidBatchEntry { index, entry } = self {
            body["index"] = json!(index);
            body["winner"] = entry.clone();
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_errors_are_classified() {
        let err: AppError = DbErr::RecordNotFound("award 01".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_invalid_batch_entry_message() {
        let err = AppError::InvalidBatchEntry {
            index: 2,
            entry: json!({ "emp_id": "E1" }),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("index 2"));
    }
}
