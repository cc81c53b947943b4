//! URL 验证模块
//!
//! 只做语法检查：去除首尾空白后必须能被解析为绝对 URL。
//! 不联网，不限制协议。

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    ControlCharacter,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::ControlCharacter => write!(f, "URL must not contain control characters"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for crate::errors::AppError {
    fn from(err: UrlValidationError) -> Self {
        crate::errors::AppError::validation(err.to_string())
    }
}

/// 验证 URL，成功时返回去除首尾空白后的原文
pub fn validate_url(url: &str) -> Result<&str, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // Url::parse 会静默丢弃其中的 tab/CR/LF，原文存下后无法作为 Location 头
    if url.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    // Url::parse 不接受相对地址
    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert_eq!(validate_url("http://example.com"), Ok("http://example.com"));
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("ftp://files.example.com/a.txt").is_ok());
        assert!(validate_url("mailto:someone@example.com").is_ok());
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_url("  https://example.com/x \n"),
            Ok("https://example.com/x")
        );
    }

    #[test]
    fn test_relative_and_garbage_rejected() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("http://"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_embedded_control_characters_rejected() {
        for url in [
            "https://example.com/a\nb",
            "https://example.com/a\r\nSet-Cookie: x=1",
            "https://exa\tmple.com/",
            "https://example.com/\u{7f}",
        ] {
            assert_eq!(
                validate_url(url),
                Err(UrlValidationError::ControlCharacter),
                "{url:?}"
            );
        }
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }
}
