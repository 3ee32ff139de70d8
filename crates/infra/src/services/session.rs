//! Login, logout and self-registration.

use invoiceflow_auth::{NewUser, Permissions, Role, User, username_taken};
use invoiceflow_core::UserId;

use crate::app::InvoiceFlow;
use crate::error::ServiceResult;

impl InvoiceFlow {
    /// Check credentials and make the user the current session.
    pub fn login(&mut self, username: &str, password: &str) -> ServiceResult<User> {
        let result = self
            .session
            .login(self.users.list(), username, password, &self.hasher)
            .cloned();
        match result {
            Ok(user) => {
                self.persist_session()?;
                tracing::info!(user = %user.username, role = %user.role, "logged in");
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(user = username, error = %err, "login failed");
                Err(err.into())
            }
        }
    }

    pub fn logout(&mut self) -> ServiceResult<Option<User>> {
        let previous = self.session.logout();
        self.persist_session()?;
        if let Some(user) = &previous {
            tracing::info!(user = %user.username, "logged out");
        }
        Ok(previous)
    }

    /// The session user, if any (active or not).
    pub fn whoami(&self) -> Option<&User> {
        self.current_user()
    }

    /// Create an active user. A taken username is a silent no-op (`None`).
    pub fn register(&mut self, new_user: NewUser) -> ServiceResult<Option<User>> {
        new_user.validate()?;
        if username_taken(self.users.list(), &new_user.username) {
            tracing::info!(user = %new_user.username.trim(), "username taken; registration skipped");
            return Ok(None);
        }
        let user = new_user.into_user(UserId::new(), &self.hasher)?;
        self.users.insert(user.clone())?;
        tracing::info!(user = %user.username, role = %user.role, "user registered");
        Ok(Some(user))
    }

    /// Self-service sign-up from the login screen.
    ///
    /// Whatever role is picked, the account starts with inventory and
    /// invoices only; wider flags are granted from team management. On
    /// success the new user becomes the session. A taken username yields
    /// `None` and leaves the session alone.
    pub fn sign_up(&mut self, username: &str, password: &str, role: Role) -> ServiceResult<Option<User>> {
        let new_user =
            NewUser::new(username, password, role).with_permissions(Permissions::MEMBER_DEFAULT);
        let Some(user) = self.register(new_user)? else {
            return Ok(None);
        };
        self.login(&user.username, password).map(Some)
    }
}
