//! Short code resolution

use std::sync::Arc;

use tracing::debug;

use crate::errors::{AppError, Result};
use crate::storage::LinkStore;
use crate::utils::is_valid_short_code;

/// Resolves short codes to their targets. Read-only, no authorization.
pub struct RedirectResolver {
    store: Arc<dyn LinkStore>,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, code: &str) -> Result<String> {
        // 格式不合法的短码不可能存在，无需查库
        if !is_valid_short_code(code) {
            debug!("Rejecting malformed short code: {:?}", code);
            return Err(AppError::not_found("Short URL not found"));
        }

        match self.store.find_link(code).await? {
            Some(link) => Ok(link.target),
            None => {
                debug!("Redirect link not found: {}", code);
                Err(AppError::not_found("Short URL not found"))
            }
        }
    }
}
