//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are opaque tokens. Freshly minted ids are UUIDv7 strings, but
//! any non-blank token is accepted so that seeded records (`"1"`, `"2"`, ...)
//! and ids written by older data files keep working.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a category tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

/// Identifier of a brand tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(String);

/// Identifier of a customer invoice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

/// Identifier of a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(String);

/// Identifier of a sales return record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnId(String);

/// Identifier of a team member (actor identity).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

macro_rules! impl_token_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Mint a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the empty placeholder token (e.g. an unselected line).
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value.to_string())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = s.trim();
                if token.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty token", $name)));
                }
                Ok(Self(token.to_string()))
            }
        }
    };
}

impl_token_newtype!(ProductId, "ProductId");
impl_token_newtype!(CategoryId, "CategoryId");
impl_token_newtype!(BrandId, "BrandId");
impl_token_newtype!(InvoiceId, "InvoiceId");
impl_token_newtype!(PurchaseOrderId, "PurchaseOrderId");
impl_token_newtype!(ReturnId, "ReturnId");
impl_token_newtype!(UserId, "UserId");
