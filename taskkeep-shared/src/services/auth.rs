//! Registration, login and token authentication.

use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::auth::jwt::TokenService;
use crate::auth::middleware::AuthContext;
use crate::auth::password;
use crate::error::{FieldViolation, ServiceError, ServiceResult};
use crate::models::user::CreateUser;
use crate::store::CredentialStore;
use crate::validation::violations;

/// Username and password as submitted by a client.
///
/// The password rule lives in [`password::validate_password`] and is only
/// applied at registration.
#[derive(Clone, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn check_registration(&self) -> ServiceResult<()> {
        let mut rejected = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => violations(&errors),
        };
        if let Err(message) = password::validate_password(&self.password) {
            rejected.push(FieldViolation::new("password", message));
        }

        if rejected.is_empty() {
            return Ok(());
        }
        rejected.sort_by(|a, b| a.field.cmp(&b.field));
        Err(ServiceError::Validation(rejected))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A signed token handed out at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,

    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Auth workflow over a credential store and a token service.
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    /// Registers a new user and returns the stored username.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty username or a short password
    /// - `Conflict` if the username is taken
    pub async fn register(&self, input: Credentials) -> ServiceResult<String> {
        input.check_registration()?;

        let Credentials { username, password } = input;
        let password_hash = blocking(move || password::hash_password(&password)).await??;

        let user = self
            .credentials
            .create(CreateUser {
                username,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.username)
    }

    /// Checks a username and password and issues a token.
    ///
    /// An unknown username and a wrong password both fail with the same
    /// `Unauthorized`. The unknown-user path still pays for one hash
    /// verification.
    pub async fn login(&self, input: Credentials) -> ServiceResult<AccessToken> {
        let Credentials { username, password } = input;

        let Some(user) = self.credentials.find_by_username(&username).await? else {
            blocking(move || password::verify_against_dummy(&password)).await?;
            debug!(%username, "Login failed");
            return Err(ServiceError::Unauthorized);
        };

        let stored_hash = user.password_hash.clone();
        let valid = blocking(move || password::verify_password(&password, &stored_hash)).await??;
        if !valid {
            debug!(%username, "Login failed");
            return Err(ServiceError::Unauthorized);
        }

        let token = self.tokens.issue(&user.username)?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AccessToken {
            token,
            expires_in: self.tokens.ttl().num_seconds(),
        })
    }

    /// Resolves a bearer token to the caller it names.
    ///
    /// Fails with `Unauthorized` if the token does not verify or its user no
    /// longer exists.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthContext> {
        let claims = self.tokens.verify(token)?;

        let user = self
            .credentials
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                debug!(username = %claims.sub, "Token names an unknown user");
                ServiceError::Unauthorized
            })?;

        Ok(AuthContext::new(user.id, user.username))
    }
}

/// Runs CPU-heavy hashing off the async worker threads.
async fn blocking<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|err| {
        tracing::error!(error = %err, "Password hashing task failed");
        ServiceError::Internal(err.to_string())
    })
}
