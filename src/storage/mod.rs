use std::sync::Arc;

use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod traits;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStore;
pub use models::{ShortLink, UserAccount};
pub use traits::{CredentialStore, LinkStore, Storage};

/// 进程内存储的 URL 前缀
pub const MEMORY_URL_PREFIX: &str = "memory://";

pub struct StorageFactory;

impl StorageFactory {
    /// 按 `database_url` 选择存储实现
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
        if config.database_url.starts_with(MEMORY_URL_PREFIX) {
            info!("Using in-memory storage; data is lost on restart");
            return Ok(Arc::new(MemoryStore::new()));
        }

        let storage = SeaOrmStorage::connect(config).await?;
        Ok(Arc::new(storage))
    }
}
