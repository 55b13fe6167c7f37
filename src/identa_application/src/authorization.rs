use identa_core::{Role, UserId};

use crate::error::AccountError;

/// Relationship between the requester and the account being accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub is_self: bool,
    pub is_admin: bool,
}

/// Grants access to the account owner or to any `ADMIN`.
pub fn authorize(
    requesting_user_id: &UserId,
    target_user_id: &UserId,
    requesting_user_roles: &[Role],
) -> Result<Access, AccountError> {
    let access = Access {
        is_self: requesting_user_id == target_user_id,
        is_admin: requesting_user_roles.contains(&Role::Admin),
    };

    if !access.is_self && !access.is_admin {
        tracing::debug!(%requesting_user_id, %target_user_id, "access denied");
        return Err(AccountError::Unauthorized);
    }
    Ok(access)
}
