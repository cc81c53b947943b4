//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AppError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证与账户错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,

    // 认证与账户错误 2000-2099
    AuthFailed = 2000,
    AlreadyAuthenticated = 2005,
    UserAlreadyExists = 2006,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkNotOwned = 3001,
    LinkInvalidUrl = 3002,
}

impl From<&AppError> for ErrorCode {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Validation(_) => ErrorCode::BadRequest,
            AppError::Unauthenticated => ErrorCode::Unauthorized,
            AppError::InvalidCredentials => ErrorCode::AuthFailed,
            AppError::AlreadyAuthenticated => ErrorCode::AlreadyAuthenticated,
            AppError::DuplicateUser(_) => ErrorCode::UserAlreadyExists,
            AppError::Forbidden => ErrorCode::LinkNotOwned,
            AppError::NotFound(_) => ErrorCode::LinkNotFound,
            AppError::DuplicateCode(_)
            | AppError::PasswordHash(_)
            | AppError::TokenIssue(_)
            | AppError::DatabaseConfig(_)
            | AppError::DatabaseConnection(_)
            | AppError::DatabaseOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
