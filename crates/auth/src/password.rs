//! Password hashing (bcrypt).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// bcrypt hasher with a configurable work factor.
///
/// Production code uses `bcrypt::DEFAULT_COST`; tests use the minimum cost (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Cheapest cost bcrypt accepts.
    pub fn fast() -> Self {
        Self { cost: 4 }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Returns `false` for a wrong password and for a malformed stored hash.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(ok) => ok,
            Err(err) => {
                tracing::warn!(error = %err, "stored password hash is unreadable");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
