//! Account lifecycle: register, login, delete

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::session::SessionService;
use crate::errors::{AppError, Result};
use crate::storage::{CredentialStore, UserAccount};
use crate::utils::password::{hash_password, verify_password};

/// 用户名最大长度（字符数）
pub const MAX_USERNAME_CHARS: usize = 64;

/// 未知用户登录时用于对齐耗时的哈希
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("dummy-password").ok());

/// A signed-in account and its session token
#[derive(Debug, Clone, Serialize)]
pub struct SignedInAccount {
    pub username: String,
    pub token: String,
    pub expires_in: i64,
}

pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    sessions: Arc<SessionService>,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>, sessions: Arc<SessionService>) -> Self {
        Self { store, sessions }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, username: &str, password: &str) -> Result<SignedInAccount> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        if self.store.find_user(&username).await?.is_some() {
            return Err(AppError::duplicate_user(&username));
        }

        let password_hash = hash_blocking(password.to_string()).await?;
        // 并发注册同名用户时由唯一约束兜底，仍返回 DuplicateUser
        self.store
            .insert_user(&UserAccount::new(username.clone(), password_hash))
            .await?;

        info!("AccountService: registered {}", username);
        self.sign_in(username)
    }

    /// Check credentials and issue a session.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<SignedInAccount> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }

        let account = self.store.find_user(username).await?;
        let matched = verify_blocking(
            password.to_string(),
            account.as_ref().map(|a| a.password_hash.clone()),
        )
        .await?;

        match account {
            Some(account) if matched => {
                info!("AccountService: {} logged in", account.username);
                self.sign_in(account.username)
            }
            _ => {
                debug!("AccountService: login rejected for {}", username);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Remove the account and every link it owns. Irreversible.
    pub async fn delete_account(&self, username: &str) -> Result<()> {
        self.store.delete_user(username).await?;
        warn!("AccountService: account {} deleted", username);
        Ok(())
    }

    fn sign_in(&self, username: String) -> Result<SignedInAccount> {
        let token = self.sessions.issue(&username)?;
        Ok(SignedInAccount {
            username,
            token,
            expires_in: self.sessions.ttl().num_seconds(),
        })
    }
}

/// 去除首尾空白并检查长度
pub fn normalize_username(username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AppError::validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_CHARS
        )));
    }
    Ok(username.to_string())
}

async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::password_hash(format!("hashing task failed: {}", e)))?
}

/// Verify on the blocking pool. `None` means the user does not exist: the
/// dummy hash is still checked so the response takes as long as a real miss.
async fn verify_blocking(password: String, hash: Option<String>) -> Result<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        // 首次访问 DUMMY_HASH 会做一次完整哈希，必须留在阻塞线程上
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&password, dummy);
            }
            Ok(false)
        }
    })
    .await
        .map_err(|e| AppError::password_hash(format!("verify task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  alice ").unwrap(), "alice");
        assert!(normalize_username("   ").is_err());
        assert!(normalize_username(&"a".repeat(64)).is_ok());
        assert!(normalize_username(&"a".repeat(65)).is_err());
        // 按字符计数而不是字节
        assert!(normalize_username(&"é".repeat(64)).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_user_verification_never_matches() {
        // 即使密码恰好等于 dummy 哈希的原文也不能通过
        assert!(!verify_blocking("dummy-password".to_string(), None).await.unwrap());
        assert!(!verify_blocking("anything".to_string(), None).await.unwrap());
        assert!(DUMMY_HASH.is_some());
    }

    #[tokio::test]
    async fn test_known_hash_verification() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_blocking("secret123".to_string(), Some(hash.clone())).await.unwrap());
        assert!(!verify_blocking("secret124".to_string(), Some(hash)).await.unwrap());
    }
}
