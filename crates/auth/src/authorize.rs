use serde::Serialize;
use thiserror::Error;

use invoiceflow_core::UserId;

use crate::{Capability, Role, User};

/// Where a denied caller should be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Redirect {
    /// No session: go log in.
    Login,
    /// Logged in but the account is switched off.
    AccountInactive,
    /// Logged in, feature not granted: back to the landing page.
    Dashboard,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not logged in")]
    Unauthenticated,

    #[error("account is inactive")]
    Inactive,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Capability),

    #[error("forbidden: '{0}' is restricted to superadmins")]
    SuperadminOnly(Capability),

    #[error("forbidden: cannot manage user {target}: {reason}")]
    CannotManage { target: UserId, reason: &'static str },
}

impl AuthzError {
    pub fn redirect(&self) -> Redirect {
        match self {
            AuthzError::Unauthenticated => Redirect::Login,
            AuthzError::Inactive => Redirect::AccountInactive,
            _ => Redirect::Dashboard,
        }
    }
}

/// Decide whether `user` may use `required`.
///
/// - No IO
/// - No panics
/// - Superadmin bypasses every flag; everyone else is gated by flags alone
pub fn authorize(user: Option<&User>, required: Capability) -> Result<(), AuthzError> {
    let user = user.ok_or(AuthzError::Unauthenticated)?;

    if !user.is_active {
        return Err(AuthzError::Inactive);
    }

    if user.is_superadmin() {
        return Ok(());
    }

    if required.is_superadmin_only() {
        return Err(AuthzError::SuperadminOnly(required));
    }

    if user.permissions.allows(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}

/// Team-management rank rule, independent of the `team` flag.
///
/// Nobody manages themselves; superadmins manage everyone else; admins manage
/// members only; members manage nobody.
pub fn can_manage(actor: &User, target: &User) -> bool {
    if actor.id == target.id {
        return false;
    }
    match actor.role {
        Role::Superadmin => true,
        Role::Admin => target.role == Role::Member,
        Role::Member => false,
    }
}

/// Full check for acting on another team member: `team` capability, then rank.
pub fn authorize_management(actor: Option<&User>, target: &User) -> Result<(), AuthzError> {
    authorize(actor, Capability::Team)?;
    let actor = actor.ok_or(AuthzError::Unauthenticated)?;

    if actor.id == target.id {
        return Err(AuthzError::CannotManage {
            target: target.id.clone(),
            reason: "users cannot manage themselves",
        });
    }
    if !can_manage(actor, target) {
        return Err(AuthzError::CannotManage {
            target: target.id.clone(),
            reason: "target outranks or equals the actor",
        });
    }
    Ok(())
}

/// Creating a team member: `team` capability, and admins may only add members.
pub fn authorize_member_creation(actor: Option<&User>, role: Role) -> Result<(), AuthzError> {
    authorize(actor, Capability::Team)?;
    let actor = actor.ok_or(AuthzError::Unauthenticated)?;

    let allowed = match actor.role {
        Role::Superadmin => role != Role::Superadmin,
        Role::Admin => role == Role::Member,
        Role::Member => role == Role::Member,
    };
    if allowed {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(Capability::Team))
    }
}

/// Every capability `user` currently holds (empty when inactive).
pub fn effective_capabilities(user: &User) -> Vec<Capability> {
    if !user.is_active {
        return Vec::new();
    }
    if user.is_superadmin() {
        let mut all = Capability::FLAGGED.to_vec();
        all.push(Capability::Billing);
        return all;
    }
    user.permissions.granted()
}
