//! API 帮助函数

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::api::constants;
use crate::config::{AuthConfig, SameSitePolicy};
use crate::errors::AppError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 内部错误对外统一使用的消息
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(message: &str, data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, message, Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateUser(_) | AppError::AlreadyAuthenticated => StatusCode::CONFLICT,
            AppError::DuplicateCode(_)
            | AppError::PasswordHash(_)
            | AppError::TokenIssue(_)
            | AppError::DatabaseConfig(_)
            | AppError::DatabaseConnection(_)
            | AppError::DatabaseOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("{} {}: {}", self.code(), self.error_type(), self.message());
            INTERNAL_ERROR_MESSAGE
        } else {
            self.message()
        };
        error_response(self.status_code(), ErrorCode::from(self), message)
    }
}

/// 当前请求的外部访问地址，例如 `https://sho.rt`
pub fn request_base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// 拼接短链接完整地址
pub fn short_url(base_url: &str, code: &str) -> String {
    format!(
        "{}{}/{}",
        base_url.trim_end_matches('/'),
        constants::REDIRECT_PREFIX,
        code
    )
}

/// 会话 Cookie 构建器
#[derive(Debug, Clone)]
pub struct SessionCookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    max_age: CookieDuration,
}

impl SessionCookieBuilder {
    pub fn from_config(config: &AuthConfig) -> Self {
        let same_site = match config.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: config.cookie_secure,
            domain: config.cookie_domain.clone().filter(|d| !d.is_empty()),
            max_age: CookieDuration::minutes(config.session_minutes.max(1) as i64),
        }
    }

    fn build_cookie_base(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(token, self.max_age)
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), CookieDuration::ZERO)
    }
}
