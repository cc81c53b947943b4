//! In-process storage
//!
//! Both maps live behind a single `RwLock` so that check-and-insert and the
//! account cascade are atomic with respect to each other.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::models::{ShortLink, UserAccount};
use super::traits::{CredentialStore, LinkStore};
use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
struct LinkEntry {
    link: ShortLink,
    owner: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    links: HashMap<String, LinkEntry>,
    users: HashMap<String, UserAccount>,
}

/// 内存存储，用于 `memory://` 地址和测试
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前链接数量
    pub fn link_count(&self) -> usize {
        self.inner.read().links.len()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn insert_link(&self, link: &ShortLink) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.links.contains_key(&link.code) {
            return Err(AppError::duplicate_code(&link.code));
        }
        inner.links.insert(
            link.code.clone(),
            LinkEntry {
                link: link.clone(),
                owner: None,
            },
        );
        Ok(())
    }

    async fn find_link(&self, code: &str) -> Result<Option<ShortLink>> {
        Ok(self.inner.read().links.get(code).map(|e| e.link.clone()))
    }

    async fn link_owner(&self, username: &str, code: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.users.contains_key(username) {
            return Err(AppError::database_operation(format!(
                "cannot link {} to unknown user {}",
                code, username
            )));
        }
        let entry = inner.links.get_mut(code).ok_or_else(|| {
            AppError::database_operation(format!("cannot link missing short code {}", code))
        })?;
        if entry.owner.is_some() {
            return Err(AppError::database_operation(format!(
                "short code {} already has an owner",
                code
            )));
        }
        entry.owner = Some(username.to_string());
        Ok(())
    }

    async fn delete_link(&self, code: &str) -> Result<()> {
        match self.inner.write().links.remove(code) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!("Short code not found: {}", code))),
        }
    }

    async fn list_owned(&self, username: &str) -> Result<Vec<ShortLink>> {
        let inner = self.inner.read();
        let mut links: Vec<ShortLink> = inner
            .links
            .values()
            .filter(|e| e.owner.as_deref() == Some(username))
            .map(|e| e.link.clone())
            .collect();
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(links)
    }

    async fn is_owner(&self, username: &str, code: &str) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .links
            .get(code)
            .is_some_and(|e| e.owner.as_deref() == Some(username)))
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, account: &UserAccount) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.users.contains_key(&account.username) {
            return Err(AppError::duplicate_user(&account.username));
        }
        inner
            .users
            .insert(account.username.clone(), account.clone());
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self.inner.read().users.get(username).cloned())
    }

    async fn delete_user(&self, username: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.users.remove(username);
        let before = inner.links.len();
        inner
            .links
            .retain(|_, e| e.owner.as_deref() != Some(username));
        debug!(
            "Removed user {} and {} owned links",
            username,
            before - inner.links.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn link(code: &str) -> ShortLink {
        ShortLink::new(code, "https://example.com")
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_without_overwrite() {
        let store = MemoryStore::new();
        store.insert_link(&link("AAAAAAAA")).await.unwrap();

        let mut other = link("AAAAAAAA");
        other.target = "https://other.example".to_string();
        let err = store.insert_link(&other).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateCode(_)));

        let found = store.find_link("AAAAAAAA").await.unwrap().unwrap();
        assert_eq!(found.target, "https://example.com");
    }

    #[tokio::test]
    async fn test_link_owner_preconditions() {
        let store = MemoryStore::new();
        store.insert_link(&link("AAAAAAAA")).await.unwrap();

        // 用户不存在
        assert!(store.link_owner("alice", "AAAAAAAA").await.is_err());

        store
            .insert_user(&UserAccount::new("alice", "$argon2id$x"))
            .await
            .unwrap();
        store
            .insert_user(&UserAccount::new("bob", "$argon2id$y"))
            .await
            .unwrap();

        // 链接不存在
        assert!(store.link_owner("alice", "BBBBBBBB").await.is_err());

        store.link_owner("alice", "AAAAAAAA").await.unwrap();
        assert!(store.is_owner("alice", "AAAAAAAA").await.unwrap());

        // 已有所有者
        assert!(store.link_owner("bob", "AAAAAAAA").await.is_err());
        assert!(!store.is_owner("bob", "AAAAAAAA").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_owned_newest_first() {
        let store = MemoryStore::new();
        store
            .insert_user(&UserAccount::new("alice", "h"))
            .await
            .unwrap();

        let now = Utc::now();
        for (i, code) in ["AAAAAAAA", "BBBBBBBB", "CCCCCCCC"].iter().enumerate() {
            let mut l = link(code);
            l.created_at = now + Duration::seconds(i as i64);
            store.insert_link(&l).await.unwrap();
            store.link_owner("alice", code).await.unwrap();
        }
        store.insert_link(&link("DDDDDDDD")).await.unwrap();

        let codes: Vec<_> = store
            .list_owned("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["CCCCCCCC", "BBBBBBBB", "AAAAAAAA"]);
    }

    #[tokio::test]
    async fn test_delete_user_cascades_only_own_links() {
        let store = MemoryStore::new();
        store
            .insert_user(&UserAccount::new("alice", "h"))
            .await
            .unwrap();
        store.insert_link(&link("AAAAAAAA")).await.unwrap();
        store.insert_link(&link("BBBBBBBB")).await.unwrap();
        store.link_owner("alice", "AAAAAAAA").await.unwrap();

        store.delete_user("alice").await.unwrap();

        assert!(store.find_user("alice").await.unwrap().is_none());
        assert!(store.find_link("AAAAAAAA").await.unwrap().is_none());
        assert!(store.find_link("BBBBBBBB").await.unwrap().is_some());
        assert_eq!(store.link_count(), 1);

        // 再删一次不报错
        store.delete_user("alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_user() {
        let store = MemoryStore::new();
        store
            .insert_user(&UserAccount::new("alice", "h1"))
            .await
            .unwrap();
        let err = store
            .insert_user(&UserAccount::new("alice", "h2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser(_)));
        let stored = store.find_user("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "h1");
    }

    #[tokio::test]
    async fn test_delete_missing_link_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_link("AAAAAAAA").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
