//! `invoiceflow-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error model, opaque identifiers, money helpers and the `Entity`
//! trait that the per-collection repositories are keyed on.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, LineIssue, StockShortfall};
pub use id::{
    BrandId, CategoryId, InvoiceId, ProductId, PurchaseOrderId, ReturnId, UserId,
};
