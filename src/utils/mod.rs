pub mod password;
pub mod url_validator;

/// 短码字符集：52 个大小写英文字母
pub const SHORT_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 短码长度
pub const SHORT_CODE_LENGTH: usize = 8;

/// 从字母表中均匀独立地抽取 `length` 个字符
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| {
        SHORT_CODE_ALPHABET[rand::random_range(0..SHORT_CODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 检查短码格式：恰好 8 个 ASCII 字母
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphabetic())
}
