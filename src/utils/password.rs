//! Argon2id password hashing
//!
//! Hashes are stored in PHC string form (`$argon2id$v=19$...`) so the
//! parameters and salt travel with the hash.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::{AppError, Result};

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::password_hash(format!("hashing failed: {}", e)))
}

/// Check `password` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unparseable hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::password_hash(format!("stored hash is malformed: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::password_hash(format!("verification failed: {}", e))),
    }
}

/// 是否为可解析的 Argon2 PHC 字符串
pub fn is_argon2_hash(s: &str) -> bool {
    PasswordHash::new(s).is_ok_and(|hash| hash.algorithm.as_str().starts_with("argon2"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("secret123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(is_argon2_hash(&hash));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("secret123"));
    }

    #[test]
    fn test_plaintext_is_not_a_hash() {
        assert!(!is_argon2_hash("secret123"));
        assert!(matches!(
            verify_password("secret123", "secret123"),
            Err(AppError::PasswordHash(_))
        ));
    }
}
