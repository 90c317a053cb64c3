//! Password value object - Domain layer password handling.
//!
//! Wraps an Argon2id PHC string. The plaintext only ever enters through a
//! [`SecretString`], which is zeroized when the caller drops it.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
};
use crate::errors::{AppError, AppResult};

/// Argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

impl PasswordPolicy {
    /// Check the parameters are accepted by Argon2.
    pub fn validate(&self) -> AppResult<()> {
        self.params().map(|_| ())
    }

    fn params(&self) -> AppResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AppError::hash("PasswordPolicy.params", e.to_string()))
    }

    fn argon2(&self) -> AppResult<Argon2<'static>> {
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params()?))
    }
}

/// Password value object that handles hashing and verification.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// CPU and memory bound; call it off the async executor.
    pub fn hash(plain_text: &SecretString, policy: &PasswordPolicy) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = policy
            .argon2()?
            .hash_password(plain_text.expose_secret().as_bytes(), &salt)
            .map_err(|e| AppError::hash("Password.hash", e.to_string()))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext password against this hash.
    ///
    /// Returns `Ok(false)` on mismatch. A stored value that is not a valid
    /// PHC string, or any other verifier failure, is an error: it points at
    /// corrupted data rather than a wrong password.
    pub fn verify(&self, plain_text: &SecretString) -> AppResult<bool> {
        let parsed = PasswordHash::new(&self.hash)
            .map_err(|e| AppError::hash("Password.verify", format!("invalid hash format: {}", e)))?;

        // Parameters come from the PHC string, not from the current policy.
        match Argon2::default().verify_password(plain_text.expose_secret().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(AppError::hash("Password.verify", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn fast_policy() -> PasswordPolicy {
        PasswordPolicy {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::hash(&secret("SecurePassword123!"), &fast_policy()).unwrap();

        assert!(password.verify(&secret("SecurePassword123!")).unwrap());
        assert!(!password.verify(&secret("WrongPassword123")).unwrap());
    }

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let password = Password::hash(&secret("pw123456"), &fast_policy()).unwrap();

        assert!(password.as_str().starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(!password.as_str().contains("pw123456"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = secret("TestPassword123");
        let hash = Password::hash(&plain, &fast_policy()).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(&plain).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = secret("SamePassword123");
        let pass1 = Password::hash(&plain, &fast_policy()).unwrap();
        let pass2 = Password::hash(&plain, &fast_policy()).unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(&plain).unwrap());
        assert!(pass2.verify(&plain).unwrap());
    }

    #[test]
    fn test_verify_uses_params_embedded_in_hash() {
        let plain = secret("pw123456");
        let stronger = PasswordPolicy {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        };
        let password = Password::hash(&plain, &stronger).unwrap();

        assert!(password.verify(&plain).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_infrastructure_error() {
        let stored = Password::from_hash("pw123456");
        let err = stored.verify(&secret("pw123456")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = PasswordPolicy {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        };
        assert!(policy.validate().is_err());
        assert!(PasswordPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::hash(&secret("pw123456"), &fast_policy()).unwrap();
        assert_eq!(format!("{:?}", password), "Password { hash: \"[REDACTED]\" }");
    }
}
