//! Invoicing domain module.
//!
//! Invoice records plus the lifecycle rules that tie an invoice's status to
//! stock: which quantities a saved invoice holds, how much stock an edit may
//! claim, and the net stock change of any create/update/delete. Pure logic;
//! the caller owns persistence and applies the returned delta.

pub mod invoice;
pub mod lifecycle;

pub use invoice::{Invoice, InvoiceDraft, InvoiceLine, InvoiceStatus};
pub use lifecycle::{check_availability, compute_stock_delta, reserved_quantities, transition};
