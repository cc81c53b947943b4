//! Session guards and extractors
//!
//! `SessionGuard` wraps routes that must (or must not) carry a valid
//! session. The handler is never called when the guard rejects.

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::constants;
use crate::errors::AppError;
use crate::services::SessionService;

/// 已验证的会话用户，由中间件写入请求扩展
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GuardMode {
    Authenticated,
    Anonymous,
}

/// 从 Authorization header 提取 Bearer token，失败时回退到会话 Cookie
fn extract_session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    bearer.or_else(|| {
        req.cookie(constants::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// 解析请求携带的会话，缺失或无效时返回 `None`
fn resolve_session(req: &HttpRequest, sessions: &SessionService) -> Option<String> {
    let token = extract_session_token(req)?;
    sessions.verify(&token).ok()
}

/// Route guard on the session state
#[derive(Clone)]
pub struct SessionGuard {
    sessions: Arc<SessionService>,
    mode: GuardMode,
}

impl SessionGuard {
    /// Reject with 401 unless the request carries a valid session.
    pub fn require_authenticated(sessions: Arc<SessionService>) -> Self {
        Self {
            sessions,
            mode: GuardMode::Authenticated,
        }
    }

    /// Reject with 409 when the request already carries a valid session.
    /// Invalid or expired credentials count as anonymous.
    pub fn require_anonymous(sessions: Arc<SessionService>) -> Self {
        Self {
            sessions,
            mode: GuardMode::Anonymous,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
            mode: self.mode,
        }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: Rc<S>,
    sessions: Arc<SessionService>,
    mode: GuardMode,
}

impl<S, B> SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn reject(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
        req.into_response(err.error_response().map_into_right_body())
    }
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let session = resolve_session(req.request(), &self.sessions);
        let mode = self.mode;

        Box::pin(async move {
            match (mode, session) {
                (GuardMode::Authenticated, Some(username)) => {
                    trace!("Session accepted for {}", username);
                    req.extensions_mut().insert(SessionUser(username));
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                (GuardMode::Authenticated, None) => {
                    debug!("Rejecting unauthenticated request to {}", req.path());
                    Ok(Self::reject(req, AppError::Unauthenticated))
                }
                (GuardMode::Anonymous, Some(username)) => {
                    debug!("Rejecting {} on anonymous-only route {}", username, req.path());
                    Ok(Self::reject(req, AppError::AlreadyAuthenticated))
                }
                (GuardMode::Anonymous, None) => Ok(srv.call(req).await?.map_into_left_body()),
            }
        })
    }
}

/// Username of the authenticated requester.
///
/// Reads the identity placed by `SessionGuard`; on an unguarded route the
/// session is verified on the spot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(SessionUser(username)) = req.extensions().get::<SessionUser>() {
            return ready(Ok(AuthenticatedUser(username.clone())));
        }

        let resolved = req
            .app_data::<web::Data<SessionService>>()
            .and_then(|sessions| resolve_session(req, sessions));
        ready(resolved.map(AuthenticatedUser).ok_or(AppError::Unauthenticated))
    }
}

/// Username of the requester if a valid session is present.
///
/// A missing, malformed or expired credential yields anonymous.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionalUser(pub Option<String>);

impl OptionalUser {
    pub fn username(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(SessionUser(username)) = req.extensions().get::<SessionUser>() {
            return ready(Ok(OptionalUser(Some(username.clone()))));
        }

        let username = req
            .app_data::<web::Data<SessionService>>()
            .and_then(|sessions| resolve_session(req, sessions));
        ready(Ok(OptionalUser(username)))
    }
}
