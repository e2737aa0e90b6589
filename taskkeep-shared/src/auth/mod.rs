/// Authentication and authorization primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: HS256 token issuance and verification
/// - [`middleware`]: caller identity and bearer-token extraction
/// - [`authorization`]: task ownership checks
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskkeep_shared::auth::jwt::TokenService;
/// use taskkeep_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("secret123")?;
/// assert!(verify_password("secret123", &hash)?);
///
/// let tokens = TokenService::new("a-secret-that-is-at-least-32-bytes-long", Duration::hours(1));
/// let token = tokens.issue("alice")?;
/// assert_eq!(tokens.verify(&token)?.sub, "alice");
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
