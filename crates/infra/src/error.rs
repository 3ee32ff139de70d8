//! Storage and service-boundary errors.

use thiserror::Error;

use invoiceflow_auth::{AuthzError, LoginError, PasswordError};
use invoiceflow_core::DomainError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store key '{0}'")]
    InvalidKey(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Everything an application service can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl ServiceError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_authz(&self) -> Option<&AuthzError> {
        match self {
            ServiceError::Authz(err) => Some(err),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
