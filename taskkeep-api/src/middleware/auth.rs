/// Bearer-token authentication
///
/// Reads `Authorization: Bearer <token>`, resolves it through
/// `AuthService::authenticate`, and inserts the caller's `AuthContext` into
/// the request extensions. Any failure short of an internal error becomes the
/// same 401, so clients cannot tell a malformed token from an expired one or
/// from a deleted user.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use taskkeep_shared::auth::middleware::bearer_token;
use taskkeep_shared::error::ServiceError;

use crate::app::AppState;
use crate::error::ApiError;

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let caller = state.auth.authenticate(token).await.map_err(|err| match err {
        ServiceError::Internal(_) => ApiError::from(err),
        _ => ApiError::invalid_token(),
    })?;

    tracing::Span::current().record("user_id", tracing::field::display(caller.user_id));
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
