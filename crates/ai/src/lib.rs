//! `invoiceflow-ai`
//!
//! **Responsibility:** optional text-generation boundary (product descriptions
//! and business insights).
//!
//! This crate is intentionally **not** part of the domain model:
//! - It does not depend on catalog or invoice records; callers hand in plain
//!   summaries.
//! - It never mutates domain state.
//! - Every failure collapses into a fixed fallback string, so callers only
//!   ever populate an optional text field.

pub mod describe;
pub mod generator;
pub mod insights;
pub mod result;

pub use describe::describe_product;
pub use generator::TextGenerator;
pub use insights::{BusinessSummary, business_insights};
pub use result::AiError;
