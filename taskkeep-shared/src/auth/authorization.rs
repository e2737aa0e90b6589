/// Ownership checks for task records
///
/// Every task has exactly one owner, and only the owner may read, update or
/// delete it. There are no roles or shared access.
///
/// # Example
///
/// ```
/// use taskkeep_shared::auth::authorization::require_ownership;
/// use taskkeep_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let caller = AuthContext::new(owner, "alice");
///
/// assert!(require_ownership(&caller, owner).is_ok());
/// assert!(require_ownership(&caller, Uuid::new_v4()).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::error::ServiceError;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller does not own the resource
    #[error("user {caller} does not own the resource owned by {owner}")]
    NotOwner { caller: Uuid, owner: Uuid },
}

impl From<AuthzError> for ServiceError {
    fn from(_: AuthzError) -> Self {
        ServiceError::Forbidden("task")
    }
}

/// Checks that `auth` is the owner of a resource
///
/// # Errors
///
/// Returns `AuthzError::NotOwner` if the IDs differ
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::NotOwner {
            caller: auth.user_id,
            owner: resource_owner_id,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_ownership() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(require_ownership(&AuthContext::new(owner, "alice"), owner).is_ok());

        let err = require_ownership(&AuthContext::new(other, "bob"), owner).unwrap_err();
        assert_eq!(err, AuthzError::NotOwner { caller: other, owner });
    }

    #[test]
    fn test_not_owner_maps_to_forbidden() {
        let err = AuthzError::NotOwner {
            caller: Uuid::new_v4(),
            owner: Uuid::new_v4(),
        };
        assert_eq!(ServiceError::from(err), ServiceError::Forbidden("task"));
    }
}
