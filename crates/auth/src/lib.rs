//! `invoiceflow-auth`: roles, capability flags and the authorization rules.
//!
//! This crate is intentionally decoupled from storage: callers hand in user
//! records and get back allow/deny decisions.

pub mod authorize;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod user;

pub use authorize::{
    AuthzError, Redirect, authorize, authorize_management, authorize_member_creation,
    can_manage, effective_capabilities,
};
pub use password::{PasswordError, PasswordHasher};
pub use permissions::{Capability, Permissions};
pub use roles::Role;
pub use session::{LoginError, Session, SessionChange};
pub use user::{NewUser, User, username_taken};
