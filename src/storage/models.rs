use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 短链接记录，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    pub fn new(code: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
            created_at: Utc::now(),
        }
    }
}

/// 用户账户；只保存 Argon2 哈希，从不保存明文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}
