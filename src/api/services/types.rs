//! API 请求与响应类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{LinkCreateResult, SignedInAccount};
use crate::storage::ShortLink;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LinkResponse {
    pub code: String,
    pub target: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl LinkResponse {
    pub fn from_link(link: ShortLink, base_url: &str, owner: Option<String>) -> Self {
        Self {
            short_url: super::helpers::short_url(base_url, &link.code),
            code: link.code,
            target: link.target,
            created_at: link.created_at,
            owner,
        }
    }

    pub fn from_created(result: LinkCreateResult, base_url: &str) -> Self {
        Self::from_link(result.link, base_url, result.owner)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl From<SignedInAccount> for SessionResponse {
    fn from(account: SignedInAccount) -> Self {
        Self {
            username: account.username,
            token: Some(account.token),
            expires_in: Some(account.expires_in),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
}
