use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderValue, LOCATION};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::errors::AppError;
use crate::services::RedirectResolver;

pub struct RedirectService;

impl RedirectService {
    #[instrument(skip(resolver), fields(code = %path))]
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<RedirectResolver>,
    ) -> HttpResponse {
        let code = path.into_inner();

        match resolver.resolve(&code).await {
            Ok(target) => match Self::location_header(&target) {
                Some(location) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                    .insert_header((LOCATION, location))
                    .finish(),
                None => {
                    error!("Stored target for {} is not a valid Location: {:?}", code, target);
                    Self::internal_error_response()
                }
            },
            Err(AppError::NotFound(_)) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Redirect lookup failed for {}: {}", code, e);
                Self::internal_error_response()
            }
        }
    }

    /// 目标原样可用时直接写入；否则按 URL 规范序列化（去掉 tab/CR/LF 等）
    fn location_header(target: &str) -> Option<HeaderValue> {
        if let Ok(value) = HeaderValue::from_str(target) {
            return Some(value);
        }
        let normalized = Url::parse(target).ok()?;
        warn!("Normalizing stored target before redirect: {:?}", target);
        HeaderValue::from_str(normalized.as_str()).ok()
    }

    fn internal_error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal Server Error")
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Not Found")
    }
}
