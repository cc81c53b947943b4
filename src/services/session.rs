//! Stateless login sessions
//!
//! A session is an HS256-signed token carrying `{username, iat, exp}`.
//! Nothing is stored server-side; validity is decided by the signature
//! and the expiry alone.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::errors::{AppError, Result};

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// 签名密钥与有效期
#[derive(Clone)]
pub struct SessionConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl SessionConfig {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// 从配置构建；密钥为空时生成随机密钥，重启后旧会话全部失效
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        let ttl = Duration::minutes(config.session_minutes.max(1) as i64);
        if config.jwt_secret.is_empty() {
            warn!("auth.jwt_secret is empty, generating a random secret; sessions will not survive restarts");
            let secret: [u8; 32] = rand::random();
            return Self::new(secret.to_vec(), ttl);
        }
        Self::new(config.jwt_secret.as_bytes(), ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Issues and verifies session tokens
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionService {
    pub fn new(config: &SessionConfig) -> Self {
        // 只接受 HS256，过期判断不留余量
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            ttl: config.ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `username`, valid for the configured ttl.
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::token_issue(format!("failed to sign session: {}", e)))
    }

    /// Return the username a token was issued for.
    ///
    /// Every failure is reported as `Unauthenticated`; the reason is only
    /// visible in debug logs.
    pub fn verify(&self, token: &str) -> Result<String> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Session rejected: {}", e);
                AppError::Unauthenticated
            })?
            .claims;

        if claims.exp <= Utc::now().timestamp() {
            debug!("Session rejected: expired");
            return Err(AppError::Unauthenticated);
        }
        if claims.username.trim().is_empty() {
            debug!("Session rejected: empty username");
            return Err(AppError::Unauthenticated);
        }

        Ok(claims.username)
    }
}
