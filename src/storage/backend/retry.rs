//! 瞬时数据库错误的重试
//!
//! 连接断开、死锁、锁等待超时、SQLite BUSY 按指数退避重试；
//! 唯一约束冲突之类的逻辑错误直接返回给调用方。

use std::future::Future;
use std::time::Duration;

use sea_orm::{DbErr, SqlErr};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 各数据库中表示死锁/锁冲突的错误码
const TRANSIENT_DB_CODES: &[&str] = &[
    "1213", "1205", // MySQL 死锁、锁等待超时
    "40001", "40P01", // PostgreSQL 序列化失败、死锁
    "5", "6", // SQLite BUSY / LOCKED
];

/// 唯一约束冲突，不可重试
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    if is_unique_violation(err) {
        return false;
    }
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => is_transient(runtime_err),
        _ => false,
    }
}

fn is_transient(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            let code = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
            match code {
                Some(code) => TRANSIENT_DB_CODES.contains(&code.as_str()),
                None => is_transient_message(&sqlx_err.to_string()),
            }
        }
        RuntimeErr::Internal(msg) => is_transient_message(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn is_transient_message(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    ["deadlock", "lock wait timeout", "database is locked", "serialization failure"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// 重试配置
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// 指数退避重试执行器
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} retries", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if attempt < config.max_retries && is_retryable_error(&e) => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 指数退避延迟，附加 0-25% 随机抖动
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    capped.saturating_add(rand::random_range(0..=capped / 4))
}
