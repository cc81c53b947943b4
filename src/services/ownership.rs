//! Ownership checks for link mutations

use tracing::debug;

use crate::errors::{AppError, Result};
use crate::storage::LinkStore;

/// Outcome of an ownership lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipDecision {
    Owner,
    NotOwner,
    Missing,
}

impl OwnershipDecision {
    /// `NotOwner` and `Missing` both become `Forbidden`, so callers cannot
    /// probe for codes they do not own.
    pub fn into_result(self) -> Result<()> {
        match self {
            OwnershipDecision::Owner => Ok(()),
            OwnershipDecision::NotOwner | OwnershipDecision::Missing => Err(AppError::Forbidden),
        }
    }
}

/// Decide whether `username` owns `code`. Must run before any deletion.
pub async fn require_ownership(
    store: &dyn LinkStore,
    username: &str,
    code: &str,
) -> Result<OwnershipDecision> {
    if store.is_owner(username, code).await? {
        return Ok(OwnershipDecision::Owner);
    }

    let decision = if store.find_link(code).await?.is_some() {
        OwnershipDecision::NotOwner
    } else {
        OwnershipDecision::Missing
    };
    debug!("Ownership denied for {} on {}: {:?}", username, code, decision);
    Ok(decision)
}
