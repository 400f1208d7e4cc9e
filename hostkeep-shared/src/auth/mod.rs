/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: bearer token issuance and validation
/// - [`middleware`]: Axum guard turning a bearer token into an `AuthContext`
///
/// Registration, login and password reset live in `services::users`, which
/// combines these with the entity store.
///
/// # Example
///
/// ```no_run
/// use hostkeep_shared::auth::password::{hash_password, verify_password, HashParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &HashParams::default())?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
