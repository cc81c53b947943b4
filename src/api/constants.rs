//! API 模块常量定义

/// 会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "login";

/// 短链接跳转路径前缀
pub const REDIRECT_PREFIX: &str = "/u";
