//! 链接 API

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use crate::api::middleware::{AuthenticatedUser, OptionalUser};
use crate::errors::AppError;
use crate::services::LinkService;

use super::error_code::ErrorCode;
use super::helpers::{json_response, request_base_url, success_response};
use super::types::{LinkResponse, ShortenRequest};

/// 创建短链接；登录用户创建的链接归其所有
pub async fn post_link(
    req: HttpRequest,
    user: OptionalUser,
    body: web::Json<ShortenRequest>,
    links: web::Data<LinkService>,
) -> Result<HttpResponse, AppError> {
    let result = links.shorten(&body.url, user.username()).await?;
    let response = LinkResponse::from_created(result, &request_base_url(&req));

    Ok(json_response(
        StatusCode::CREATED,
        ErrorCode::Success,
        "Shortened URL created",
        Some(response),
    ))
}

/// 列出当前用户的链接，按创建时间倒序
pub async fn list_links(
    req: HttpRequest,
    user: AuthenticatedUser,
    links: web::Data<LinkService>,
) -> Result<HttpResponse, AppError> {
    let base_url = request_base_url(&req);
    let owned: Vec<LinkResponse> = links
        .list_owned(user.username())
        .await?
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &base_url, Some(user.username().to_string())))
        .collect();

    trace!("Returning {} links for {}", owned.len(), user.username());
    Ok(success_response("OK", owned))
}

/// 删除当前用户拥有的链接
pub async fn delete_link(
    user: AuthenticatedUser,
    path: web::Path<String>,
    links: web::Data<LinkService>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    links.delete_owned(user.username(), &code).await?;

    Ok(json_response::<()>(
        StatusCode::OK,
        ErrorCode::Success,
        "Deleted shortened URL",
        None,
    ))
}
