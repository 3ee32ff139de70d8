//! Inventory domain module.
//!
//! This crate contains the product catalog records and the stock ledger,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod ledger;
pub mod product;

pub use ledger::{StockDelta, StockLedger, StockMovement};
pub use product::{Brand, Category, Product};
