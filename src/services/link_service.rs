//! Link management service
//!
//! Shortening, listing and deleting links on behalf of a (possibly
//! anonymous) requester.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::code_generator::{CodeGenerator, RandomCodeGenerator};
use super::ownership::require_ownership;
use crate::errors::{AppError, Result};
use crate::storage::{LinkStore, ShortLink};
use crate::utils::url_validator::validate_url;

/// Result of link creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCreateResult {
    /// The created link
    pub link: ShortLink,
    /// Owner actually recorded; `None` when anonymous or when linking failed
    pub owner: Option<String>,
}

/// Service for link management operations
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    generator: Arc<dyn CodeGenerator>,
}

impl LinkService {
    /// Create a LinkService with the random 8-letter generator
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self::with_generator(store, Arc::new(RandomCodeGenerator))
    }

    pub fn with_generator(store: Arc<dyn LinkStore>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self { store, generator }
    }

    /// Shorten `target`, optionally on behalf of `owner`.
    ///
    /// Ownership is best-effort: once the link is persisted a failure to
    /// record the owner only downgrades the result to an unowned link.
    pub async fn shorten(&self, target: &str, owner: Option<&str>) -> Result<LinkCreateResult> {
        let target = validate_url(target)?;
        let link = self.insert_unique(target).await?;

        let owner = match owner {
            Some(username) => match self.store.link_owner(username, &link.code).await {
                Ok(()) => Some(username.to_string()),
                Err(e) => {
                    warn!(
                        "LinkService: failed to record owner {} for {}: {}",
                        username, link.code, e
                    );
                    None
                }
            },
            None => None,
        };

        info!(
            "LinkService: created link '{}' -> '{}' (owner: {})",
            link.code,
            link.target,
            owner.as_deref().unwrap_or("-")
        );
        Ok(LinkCreateResult { link, owner })
    }

    /// 生成 → 查重 → 插入，直到得到未被占用的短码
    async fn insert_unique(&self, target: &str) -> Result<ShortLink> {
        loop {
            let code = self.generator.generate();

            if self.store.find_link(&code).await?.is_some() {
                debug!("Short code collision on lookup: {}", code);
                continue;
            }

            let link = ShortLink::new(code, target);
            match self.store.insert_link(&link).await {
                Ok(()) => return Ok(link),
                // 查重与插入之间被并发请求抢占
                Err(AppError::DuplicateCode(_)) => {
                    debug!("Short code collision on insert: {}", link.code);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Links owned by `username`, newest first
    pub async fn list_owned(&self, username: &str) -> Result<Vec<ShortLink>> {
        self.store.list_owned(username).await
    }

    /// Delete `code` if and only if `username` owns it.
    ///
    /// Not owning the link and the link not existing are indistinguishable.
    pub async fn delete_owned(&self, username: &str, code: &str) -> Result<()> {
        require_ownership(self.store.as_ref(), username, code)
            .await?
            .into_result()?;

        self.store.delete_link(code).await?;
        info!("LinkService: {} deleted link '{}'", username, code);
        Ok(())
    }
}
