use std::path::Path;

use serde::{Deserialize, Serialize};

/// Cookie SameSite 属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSitePolicy {
    #[serde(alias = "strict")]
    Strict,
    #[default]
    #[serde(alias = "lax")]
    Lax,
    #[serde(alias = "none")]
    None,
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 启动配置
///
/// 来源优先级：环境变量 > 配置文件 > 默认值。
/// 在 `main` 中加载一次后按引用向下传递。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaticConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 环境变量前缀，例如 `URLS__SERVER__PORT=9999`
    pub const ENV_PREFIX: &'static str = "URLS";

    /// Load `path` (optional) and overlay `URLS__*` environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 以 TOML 形式输出全部默认值
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# failed to render sample config: {}", e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HTTP worker 数量
    pub cpu_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cpu_count: num_cpus::get(),
        }
    }
}

/// 存储连接配置
///
/// `database_url` 以 `memory://` 开头时使用进程内存储；
/// 其余按 URL 推断为 SQLite、MySQL/MariaDB 或 PostgreSQL。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub pool_size: u32,
    /// 获取连接的超时（秒）
    pub timeout: u64,
    pub retry_count: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "urlshortener.db".to_string(),
            pool_size: 10,
            timeout: 30,
            retry_count: 3,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2000,
        }
    }
}

/// Session signing and cookie attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 签名密钥，留空则启动时随机生成
    pub jwt_secret: String,
    pub session_minutes: u64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSitePolicy,
    pub cookie_domain: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_minutes: 60,
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::Lax,
            cookie_domain: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter 语法，`RUST_LOG` 优先
    pub level: String,
    pub format: LogFormat,
    /// 为空时输出到 stdout
    pub file: Option<String>,
    pub max_backups: u32,
    pub enable_rotation: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
            max_backups: 5,
            enable_rotation: true,
        }
    }
}
