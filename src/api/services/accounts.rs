//! 账户与会话 API

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::info;

use crate::api::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::{AccountService, SignedInAccount};

use super::error_code::ErrorCode;
use super::helpers::{SessionCookieBuilder, json_response, success_response};
use super::types::{CredentialsRequest, SessionResponse};

fn signed_in_response(
    status: StatusCode,
    message: &str,
    account: SignedInAccount,
    cookies: &SessionCookieBuilder,
) -> HttpResponse {
    let cookie = cookies.build_session_cookie(account.token.clone());
    let mut response = json_response(
        status,
        ErrorCode::Success,
        message,
        Some(SessionResponse::from(account)),
    );
    // add_cookie 只会因 cookie 编码失败而出错
    if let Err(e) = response.add_cookie(&cookie) {
        tracing::warn!("Failed to attach session cookie: {}", e);
    }
    response
}

/// 注册并直接登录
pub async fn register(
    body: web::Json<CredentialsRequest>,
    accounts: web::Data<AccountService>,
    cookies: web::Data<SessionCookieBuilder>,
) -> Result<HttpResponse, AppError> {
    let account = accounts.register(&body.username, &body.password).await?;
    Ok(signed_in_response(
        StatusCode::CREATED,
        "User created",
        account,
        &cookies,
    ))
}

pub async fn login(
    body: web::Json<CredentialsRequest>,
    accounts: web::Data<AccountService>,
    cookies: web::Data<SessionCookieBuilder>,
) -> Result<HttpResponse, AppError> {
    let account = accounts.login(&body.username, &body.password).await?;
    Ok(signed_in_response(
        StatusCode::OK,
        "Logged in",
        account,
        &cookies,
    ))
}

/// 会话无状态，登出只需让 Cookie 过期
pub async fn logout(cookies: web::Data<SessionCookieBuilder>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookies.build_expired_session_cookie())
        .json(super::types::ApiResponse::<()> {
            code: ErrorCode::Success as i32,
            message: "Logged out".to_string(),
            data: None,
        })
}

/// 当前会话的用户名
pub async fn current_session(user: AuthenticatedUser) -> HttpResponse {
    success_response(
        "OK",
        SessionResponse {
            username: user.0,
            token: None,
            expires_in: None,
        },
    )
}

/// 删除账户及其全部链接，不可恢复
pub async fn delete_account(
    user: AuthenticatedUser,
    accounts: web::Data<AccountService>,
    cookies: web::Data<SessionCookieBuilder>,
) -> Result<HttpResponse, AppError> {
    accounts.delete_account(user.username()).await?;
    info!("Account {} deleted via API", user.username());

    Ok(HttpResponse::Ok()
        .cookie(cookies.build_expired_session_cookie())
        .json(super::types::ApiResponse::<()> {
            code: ErrorCode::Success as i32,
            message: "User deleted".to_string(),
            data: None,
        }))
}
