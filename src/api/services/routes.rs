//! 路由配置

use std::sync::Arc;

use actix_web::web;

use crate::api::constants;
use crate::api::middleware::SessionGuard;
use crate::errors::AppError;
use crate::services::SessionService;

use super::accounts::{current_session, delete_account, login, logout, register};
use super::health::HealthService;
use super::links::{delete_link, list_links, post_link};
use super::redirect::RedirectService;

/// 请求体解析失败时同样返回统一信封
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| AppError::validation(format!("Invalid request body: {}", err)).into())
}

/// 链接路由 `/links`
///
/// - POST /links - 创建链接（可选登录）
/// - GET /links - 当前用户的链接
/// - DELETE /links/{code} - 删除自己的链接
pub fn links_routes(sessions: Arc<SessionService>) -> actix_web::Scope {
    web::scope("/links")
        .route("", web::post().to(post_link))
        .route(
            "",
            web::get()
                .to(list_links)
                .wrap(SessionGuard::require_authenticated(sessions.clone())),
        )
        .route(
            "/{code}",
            web::delete()
                .to(delete_link)
                .wrap(SessionGuard::require_authenticated(sessions)),
        )
}

/// 认证路由 `/auth`
///
/// - POST /auth/register, /auth/login - 仅限未登录
/// - POST /auth/logout
/// - GET /auth/session - 当前会话
pub fn auth_routes(sessions: Arc<SessionService>) -> actix_web::Scope {
    web::scope("/auth")
        .route(
            "/register",
            web::post()
                .to(register)
                .wrap(SessionGuard::require_anonymous(sessions.clone())),
        )
        .route(
            "/login",
            web::post()
                .to(login)
                .wrap(SessionGuard::require_anonymous(sessions.clone())),
        )
        .route("/logout", web::post().to(logout))
        .route(
            "/session",
            web::get()
                .to(current_session)
                .wrap(SessionGuard::require_authenticated(sessions)),
        )
}

/// 账户路由 `/account`
pub fn account_routes(sessions: Arc<SessionService>) -> actix_web::Scope {
    web::scope("/account").route(
        "",
        web::delete()
            .to(delete_account)
            .wrap(SessionGuard::require_authenticated(sessions)),
    )
}

/// 注册全部路由
///
/// 处理函数所需的服务以 `web::Data` 形式由调用方注册。
pub fn configure_routes(cfg: &mut web::ServiceConfig, sessions: Arc<SessionService>) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(HealthService::health_check))
        .service(
            web::scope("/api/v1")
                .service(links_routes(sessions.clone()))
                .service(auth_routes(sessions.clone()))
                .service(account_routes(sessions)),
        )
        .route(
            &format!("{}/{{code}}", constants::REDIRECT_PREFIX),
            web::get().to(RedirectService::handle_redirect),
        );
}
