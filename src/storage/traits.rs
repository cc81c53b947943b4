use async_trait::async_trait;

use super::models::{ShortLink, UserAccount};
use crate::errors::Result;

/// 短链接及其所有权的持久化接口
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Inserts a new link. Returns `Err(DuplicateCode)` if the code is taken;
    /// an existing link is never overwritten.
    async fn insert_link(&self, link: &ShortLink) -> Result<()>;

    /// Returns `None` if the code does not exist.
    async fn find_link(&self, code: &str) -> Result<Option<ShortLink>>;

    /// Records `username` as the owner of `code`.
    ///
    /// Fails if the link is missing, already owned, or the user does not exist.
    async fn link_owner(&self, username: &str, code: &str) -> Result<()>;

    /// Removes the link together with its ownership edge.
    async fn delete_link(&self, code: &str) -> Result<()>;

    /// Links owned by `username`, newest first.
    async fn list_owned(&self, username: &str) -> Result<Vec<ShortLink>>;

    async fn is_owner(&self, username: &str, code: &str) -> Result<bool>;
}

/// 用户凭据的持久化接口
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Returns `Err(DuplicateUser)` if the username is taken.
    async fn insert_user(&self, account: &UserAccount) -> Result<()>;

    async fn find_user(&self, username: &str) -> Result<Option<UserAccount>>;

    /// Removes the account and every link it owns in one atomic step.
    /// Deleting an unknown user is not an error.
    async fn delete_user(&self, username: &str) -> Result<()>;
}

/// 同时实现两个接口的存储
pub trait Storage: LinkStore + CredentialStore {}

impl<T: LinkStore + CredentialStore> Storage for T {}
