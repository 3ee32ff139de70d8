//! Purchasing domain module (purchase orders and the sales-return ledger).
//!
//! Pure domain logic (no IO, no storage). Approving an order credits stock
//! through the inventory ledger; returns are a passive record with no stock
//! or invoice coupling.

pub mod order;
pub mod returns;

pub use order::{PoLine, PurchaseOrder, PurchaseOrderDraft, PurchaseOrderStatus};
pub use returns::{ReturnStatus, SalesReturn};
