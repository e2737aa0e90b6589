/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new user
/// - `POST /auth/login` - Exchange credentials for a bearer token
///
/// Both take the same body:
///
/// ```json
/// { "username": "alice", "password": "secret123" }
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ApiJson,
    response::Envelope,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use taskkeep_shared::services::Credentials;

/// Register and login request
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<AuthRequest> for Credentials {
    fn from(req: AuthRequest) -> Self {
        Credentials::new(req.username, req.password)
    }
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed JWT
    pub access_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Register handler
///
/// # Errors
///
/// - 409 if the username is taken
/// - 422 if the username is empty or the password is shorter than 6 characters
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> ApiResult<Envelope<RegisterResponse>> {
    let username = state.auth.register(req.into()).await?;

    Ok(Envelope::created(RegisterResponse {
        message: "User registered successfully".to_string(),
        username,
    }))
}

/// Login handler
///
/// Unknown usernames and wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> ApiResult<Envelope<LoginResponse>> {
    let token = state.auth.login(req.into()).await?;

    Ok(Envelope::ok(LoginResponse {
        access_token: token.token,
        token_type: "Bearer".to_string(),
        expires_in: token.expires_in,
    }))
}
