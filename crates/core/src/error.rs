//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why a single invoice line failed the availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LineIssue {
    /// The line asks for more than is currently free for this invoice.
    Insufficient { requested: i64, max_available: i64 },
    /// The line references a product that is no longer in the catalog.
    UnknownProduct,
}

/// One rejected invoice line, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortfall {
    /// Zero-based position of the line in the submitted invoice.
    pub line: usize,
    pub product_id: ProductId,
    pub issue: LineIssue,
}

impl StockShortfall {
    /// Maximum quantity this line may carry right now (`None` if the product is gone).
    pub fn max_available(&self) -> Option<i64> {
        match self.issue {
            LineIssue::Insufficient { max_available, .. } => Some(max_available),
            LineIssue::UnknownProduct => None,
        }
    }
}

impl core::fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.issue {
            LineIssue::Insufficient { requested, max_available } => write!(
                f,
                "line {}: requested {} of {}, max available: {}",
                self.line + 1,
                requested,
                self.product_id,
                max_available
            ),
            LineIssue::UnknownProduct => {
                write!(f, "line {}: product {} not found", self.line + 1, self.product_id)
            }
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// stock availability, missing records, conflicts). Authorization and storage
/// failures have their own types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing customer name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// One or more lines ask for more stock than is available.
    #[error("insufficient stock on {} line(s)", .0.len())]
    InsufficientStock(Vec<StockShortfall>),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A conflict occurred (e.g. duplicate id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// `kind` names the collection, `id` the missing key.
    pub fn not_found(kind: &str, id: impl core::fmt::Display) -> Self {
        Self::NotFound(format!("{kind} {id}"))
    }

    /// The per-line shortfalls, if this is a stock error.
    pub fn shortfalls(&self) -> &[StockShortfall] {
        match self {
            Self::InsufficientStock(lines) => lines,
            _ => &[],
        }
    }
}
