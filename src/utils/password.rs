use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::AppResult;

/// One-way password hashing used by registration, login and admin seeding.
pub trait PasswordHasher: Send + Sync {
    /// Produces a self-describing hash of `password`.
    fn hash(&self, password: &str) -> AppResult<String>;

    /// Checks `password` against a hash produced by `hash`.
    ///
    /// Returns `Ok(false)` on mismatch; errors only when `hash` is malformed.
    fn verify(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Argon2id with default parameters and a random salt per hash.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    /// # Example
    /// ```ignore
    /// let hashed = Argon2Hasher::new().hash("my_secure_password")?;
    /// ```
    fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(password_hash)
    }

    fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(password_hash)?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_hash_password() {
        let hash = Argon2Hasher::new()
            .hash("test_password_123")
            .expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("test_password_123"));
    }

    #[test]
    fn test_verify_password_success() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("test_password_123").unwrap();

        assert!(hasher.verify("test_password_123", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_failure() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("test_password_123").unwrap();

        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = Argon2Hasher::new();
        let hash1 = hasher.hash("test_password_123").unwrap();
        let hash2 = hasher.hash("test_password_123").unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("test_password_123", &hash1).unwrap());
        assert!(hasher.verify("test_password_123", &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = Argon2Hasher::new().verify("pw", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
