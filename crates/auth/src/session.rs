//! The logged-in session and its cached view of the user record.

use thiserror::Error;

use crate::{PasswordHasher, User};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,
}

/// Outcome of reconciling the session with the canonical user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Unchanged,
    /// Role, active flag or permissions changed; the cached view was replaced.
    Refreshed,
    /// The session's user no longer exists.
    LoggedOut,
}

/// Current session: a cached copy of the logged-in user's record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<User>,
}

impl Session {
    pub fn new(current: Option<User>) -> Self {
        Self { current }
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Look the user up by exact username and check the password.
    ///
    /// Wrong credentials and an inactive account are reported separately.
    pub fn login(
        &mut self,
        users: &[User],
        username: &str,
        password: &str,
        hasher: &PasswordHasher,
    ) -> Result<&User, LoginError> {
        let found = users
            .iter()
            .find(|u| u.username == username && hasher.verify(password, &u.password_hash))
            .ok_or(LoginError::InvalidCredentials)?;

        if !found.is_active {
            return Err(LoginError::AccountInactive);
        }

        Ok(self.current.insert(found.clone()))
    }

    pub fn logout(&mut self) -> Option<User> {
        self.current.take()
    }

    /// Re-read the canonical record for the session user.
    ///
    /// Any change to role, active flag or permissions replaces the cached view,
    /// so a revocation takes effect on the next authorization check.
    pub fn refresh(&mut self, users: &[User]) -> SessionChange {
        let Some(cached) = self.current.as_ref() else {
            return SessionChange::Unchanged;
        };

        let canonical = match users.iter().find(|u| u.id == cached.id) {
            None => None,
            Some(canonical) if canonical.access_differs(cached) => Some(canonical.clone()),
            Some(_) => return SessionChange::Unchanged,
        };

        let change = if canonical.is_some() {
            SessionChange::Refreshed
        } else {
            SessionChange::LoggedOut
        };
        self.current = canonical;
        change
    }
}
