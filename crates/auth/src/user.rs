//! Team member records.

use serde::{Deserialize, Serialize};

use invoiceflow_core::{DomainError, DomainResult, Entity, UserId};

use crate::permissions::StoredPermissions;
use crate::{PasswordError, PasswordHasher, Permissions, Role};

/// A team member.
///
/// Deserialization goes through [`StoredUser`] so that records written before
/// a permission flag existed come back with that flag filled in for their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredUser")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub permissions: Permissions,
}

impl User {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    /// Flip the active flag, returning the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }

    /// True if `other` differs in any field that affects authorization.
    pub fn access_differs(&self, other: &User) -> bool {
        self.role != other.role
            || self.is_active != other.is_active
            || self.permissions != other.permissions
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Deserialize)]
struct StoredUser {
    id: UserId,
    username: String,
    #[serde(default)]
    password_hash: String,
    role: Role,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    permissions: Option<StoredPermissions>,
}

fn default_active() -> bool {
    true
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        let permissions = stored.permissions.unwrap_or_default().resolve(stored.role);
        Self {
            id: stored.id,
            username: stored.username,
            password_hash: stored.password_hash,
            role: stored.role,
            is_active: stored.is_active,
            permissions,
        }
    }
}

/// Registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    /// `None` applies the role's registration defaults.
    pub permissions: Option<Permissions>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
            permissions: None,
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        Ok(())
    }

    /// Build the active user record, hashing the password.
    pub fn into_user(self, id: UserId, hasher: &PasswordHasher) -> Result<User, PasswordError> {
        let password_hash = hasher.hash(&self.password)?;
        Ok(User {
            id,
            username: self.username.trim().to_string(),
            password_hash,
            role: self.role,
            is_active: true,
            permissions: self
                .permissions
                .unwrap_or_else(|| Permissions::defaults_for(self.role)),
        })
    }
}

/// Usernames are compared exactly (after trimming the candidate).
pub fn username_taken(users: &[User], username: &str) -> bool {
    let username = username.trim();
    users.iter().any(|u| u.username == username)
}
