//! Service layer for business logic
//!
//! Everything the HTTP handlers call lives here; handlers only translate
//! requests and responses.

mod account;
mod code_generator;
mod link_service;
mod ownership;
mod redirect;
mod session;

use std::sync::Arc;

pub use account::*;
pub use code_generator::{CodeGenerator, RandomCodeGenerator};
pub use link_service::*;
pub use ownership::{OwnershipDecision, require_ownership};
pub use redirect::RedirectResolver;
pub use session::{Claims, SessionConfig, SessionService};

use crate::storage::Storage;

/// All services sharing one store
#[derive(Clone)]
pub struct ServiceContext {
    pub links: Arc<LinkService>,
    pub redirects: Arc<RedirectResolver>,
    pub accounts: Arc<AccountService>,
    pub sessions: Arc<SessionService>,
}

impl ServiceContext {
    pub fn new(storage: Arc<dyn Storage>, session_config: &SessionConfig) -> Self {
        Self::with_generator(storage, session_config, Arc::new(RandomCodeGenerator))
    }

    pub fn with_generator(
        storage: Arc<dyn Storage>,
        session_config: &SessionConfig,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        let sessions = Arc::new(SessionService::new(session_config));
        Self {
            links: Arc::new(LinkService::with_generator(storage.clone(), generator)),
            redirects: Arc::new(RedirectResolver::new(storage.clone())),
            accounts: Arc::new(AccountService::new(storage, sessions.clone())),
            sessions,
        }
    }
}
