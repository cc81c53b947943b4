use std::sync::Arc;

use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::services::{AppStartTime, SessionCookieBuilder, configure_routes};
use crate::config::StaticConfig;
use crate::services::{ServiceContext, SessionConfig};
use crate::storage::{Storage, StorageFactory};

/// Everything the HTTP workers share
#[derive(Clone)]
pub struct StartupContext {
    pub services: ServiceContext,
    pub cookies: SessionCookieBuilder,
    pub start_time: AppStartTime,
}

impl StartupContext {
    /// Wire services around an already opened store
    pub fn from_storage(storage: Arc<dyn Storage>, config: &StaticConfig) -> Self {
        let session_config = SessionConfig::from_auth_config(&config.auth);
        Self {
            services: ServiceContext::new(storage, &session_config),
            cookies: SessionCookieBuilder::from_config(&config.auth),
            start_time: AppStartTime::now(),
        }
    }

    /// 注册共享数据与全部路由，供 `App::configure` 使用
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let services = &self.services;
        cfg.app_data(web::Data::from(services.links.clone()))
            .app_data(web::Data::from(services.redirects.clone()))
            .app_data(web::Data::from(services.accounts.clone()))
            .app_data(web::Data::from(services.sessions.clone()))
            .app_data(web::Data::new(self.cookies.clone()))
            .app_data(web::Data::new(self.start_time.clone()));
        configure_routes(cfg, services.sessions.clone());
    }
}

/// 准备服务器启动的上下文：打开存储并构建服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;

    let context = StartupContext::from_storage(storage, config);
    info!(
        "Pre-startup processing completed in {:.2?}",
        start_time.elapsed()
    );
    Ok(context)
}
