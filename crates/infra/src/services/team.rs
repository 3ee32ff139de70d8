//! Team management: add, activate/deactivate, re-permission, delete.
//!
//! Every mutation re-syncs the session afterwards, so a change to the acting
//! user's own record applies to their very next call.

use invoiceflow_auth::{
    Capability, NewUser, Permissions, User, authorize, authorize_management,
    authorize_member_creation,
};
use invoiceflow_core::{DomainError, UserId};

use crate::app::InvoiceFlow;
use crate::error::ServiceResult;

impl InvoiceFlow {
    pub fn list_users(&self) -> ServiceResult<&[User]> {
        self.require(Capability::Team)?;
        Ok(self.users.list())
    }

    /// Add a team member. Admins may only add members.
    ///
    /// Like [`register`](Self::register), a taken username yields `None`.
    pub fn add_member(&mut self, new_user: NewUser) -> ServiceResult<Option<User>> {
        authorize_member_creation(self.session.user(), new_user.role).map_err(|err| {
            self.log_denied(&err);
            err
        })?;
        self.register(new_user)
    }

    /// Flip a member's active flag, returning the updated record.
    pub fn toggle_user_status(&mut self, target: &UserId) -> ServiceResult<User> {
        let mut user = self.managed_user(target)?;
        let active = user.toggle_active();
        self.users.update(user.clone())?;
        self.sync_session()?;
        tracing::info!(user = %user.username, active, "user status toggled");
        Ok(user)
    }

    /// Replace a member's permission flags.
    pub fn update_user_permissions(
        &mut self,
        target: &UserId,
        permissions: Permissions,
    ) -> ServiceResult<User> {
        let mut user = self.managed_user(target)?;
        user.permissions = permissions;
        self.users.update(user.clone())?;
        self.sync_session()?;
        tracing::info!(user = %user.username, granted = ?permissions.granted(), "user permissions updated");
        Ok(user)
    }

    /// Grant or revoke a single flag.
    pub fn set_user_permission(
        &mut self,
        target: &UserId,
        capability: Capability,
        granted: bool,
    ) -> ServiceResult<User> {
        if capability.is_superadmin_only() {
            return Err(DomainError::validation(format!(
                "'{capability}' is not a grantable permission"
            ))
            .into());
        }
        let current = self.managed_user(target)?.permissions;
        self.update_user_permissions(target, current.with(capability, granted))
    }

    pub fn delete_user(&mut self, target: &UserId) -> ServiceResult<User> {
        self.managed_user(target)?;
        let removed = self.users.remove(target)?;
        self.sync_session()?;
        tracing::info!(user = %removed.username, "user deleted");
        Ok(removed)
    }

    /// Load `target` and check the session user may manage it.
    fn managed_user(&self, target: &UserId) -> ServiceResult<User> {
        authorize(self.session.user(), Capability::Team).map_err(|err| {
            self.log_denied(&err);
            err
        })?;
        let user = self
            .users
            .get(target)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", target))?;
        authorize_management(self.session.user(), &user).map_err(|err| {
            self.log_denied(&err);
            err
        })?;
        Ok(user)
    }
}
