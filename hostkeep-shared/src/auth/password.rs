/// Password hashing with Argon2id
///
/// Every hash gets a fresh random salt, so hashing the same password twice
/// yields different PHC strings. Verification reads the cost parameters back
/// out of the stored hash, so changing [`HashParams`] does not invalidate
/// existing passwords.
///
/// # Example
///
/// ```
/// use hostkeep_shared::auth::password::{hash_password, verify_password, HashParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = HashParams::default();
/// let hash = hash_password("super_secret_password_123", &params)?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Parallel lanes
    pub parallelism: u32,
}

impl Default for HashParams {
    /// 64 MiB, 3 passes, 4 lanes
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Hashes a password using Argon2id
///
/// # Returns
///
/// PHC string, e.g. `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are out of range or
/// hashing fails
pub fn hash_password(password: &str, params: &HashParams) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon_params = ParamsBuilder::new()
        .m_cost(params.memory_kib)
        .t_cost(params.iterations)
        .p_cost(params.parallelism)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon_params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// # Returns
///
/// `Ok(false)` on mismatch
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
/// or carries no hash output
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("Hash output missing".to_string()));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> HashParams {
        HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_embeds_params() {
        let hash = hash_password("test_password_123", &light()).expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=1024"));
        assert!(hash.contains("t=1"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_default_params() {
        let params = HashParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let hash1 = hash_password("same_password", &light()).expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password", &light()).expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password", &light()).expect("Hash should succeed");

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_hash_without_output_is_invalid() {
        // parses as a PHC string carrying only a salt
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Err(PasswordError::InvalidHash(_))
        ));

        let hash = hash_password("password", &light()).expect("Hash should succeed");
        let salt_only = &hash[..hash.rfind('$').unwrap()];
        assert!(matches!(
            verify_password("password", salt_only),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_zero_memory_rejected() {
        let params = HashParams {
            memory_kib: 0,
            ..light()
        };
        assert!(matches!(
            hash_password("password", &params),
            Err(PasswordError::HashError(_))
        ));
    }
}
