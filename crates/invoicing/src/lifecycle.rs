//! Stock effects of invoice create / update / delete.
//!
//! A saved invoice *reserves* stock exactly when it is `Paid`. Every
//! transition is therefore "give back what the prior version reserved, take
//! what the next version reserves". The net of that is a pure function of the
//! two versions, computed here and applied by the caller in one step.
//!
//! ```text
//! prior    next     effect
//! Paid  -> Paid     restore prior, deduct next (validated with prior's credit)
//! Paid  -> other    restore prior
//! other -> Paid     deduct next (validated against live stock)
//! other -> other    none
//! ```

use std::collections::BTreeMap;

use invoiceflow_core::{DomainError, DomainResult, LineIssue, ProductId, StockShortfall};
use invoiceflow_inventory::StockDelta;

use crate::Invoice;

/// Quantity per product held by `invoice`; empty unless it is `Paid`.
pub fn reserved_quantities(invoice: Option<&Invoice>) -> BTreeMap<ProductId, i64> {
    let mut reserved = BTreeMap::new();
    if let Some(invoice) = invoice.filter(|i| i.is_paid()) {
        for line in &invoice.items {
            let held = reserved.entry(line.product_id.clone()).or_insert(0i64);
            *held = held.saturating_add(line.quantity);
        }
    }
    reserved
}

/// Net stock change for replacing `prior` with `next`.
///
/// `None` on the left is a create, `None` on the right a delete. Entries that
/// net to zero are dropped.
pub fn compute_stock_delta(prior: Option<&Invoice>, next: Option<&Invoice>) -> StockDelta {
    let mut delta: StockDelta = reserved_quantities(prior);
    for (product_id, qty) in reserved_quantities(next) {
        let d = delta.entry(product_id).or_insert(0);
        *d = d.saturating_sub(qty);
    }
    delta.retain(|_, d| *d != 0);
    delta
}

/// Check that a `Paid` invoice fits in the stock available to it.
///
/// Available stock for a product is its live stock plus whatever `prior`
/// (the last saved version of the same invoice) reserved for it. Lines of the
/// same product share that budget, so a line's ceiling is the budget minus the
/// other lines' quantities. Non-paid invoices always pass.
///
/// Quantities too large to sum in an `i64` are an invariant violation, not
/// a shortfall.
pub fn check_availability<F>(next: &Invoice, prior: Option<&Invoice>, stock_of: F) -> DomainResult<()>
where
    F: Fn(&ProductId) -> Option<i64>,
{
    if !next.is_paid() {
        return Ok(());
    }

    let credit = reserved_quantities(prior);
    let mut requested: BTreeMap<&ProductId, i64> = BTreeMap::new();
    for line in &next.items {
        let sum = requested.entry(&line.product_id).or_insert(0);
        *sum = sum
            .checked_add(line.quantity)
            .ok_or_else(|| quantity_overflow(&line.product_id))?;
    }

    let mut shortfalls = Vec::new();
    for (idx, line) in next.items.iter().enumerate() {
        let Some(stock) = stock_of(&line.product_id) else {
            shortfalls.push(StockShortfall {
                line: idx,
                product_id: line.product_id.clone(),
                issue: LineIssue::UnknownProduct,
            });
            continue;
        };

        let overflow = || quantity_overflow(&line.product_id);
        let available = stock
            .checked_add(credit.get(&line.product_id).copied().unwrap_or(0))
            .ok_or_else(overflow)?;
        let others = requested[&line.product_id]
            .checked_sub(line.quantity)
            .ok_or_else(overflow)?;
        let ceiling = available.checked_sub(others).ok_or_else(overflow)?;

        if line.quantity > ceiling {
            shortfalls.push(StockShortfall {
                line: idx,
                product_id: line.product_id.clone(),
                issue: LineIssue::Insufficient {
                    requested: line.quantity,
                    max_available: ceiling.max(0),
                },
            });
        }
    }

    if shortfalls.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InsufficientStock(shortfalls))
    }
}

fn quantity_overflow(product_id: &ProductId) -> DomainError {
    DomainError::invariant(format!("quantity overflow for product {product_id}"))
}

/// Validate and price a lifecycle step in one call.
///
/// Returns the delta to apply; on error nothing should be written.
pub fn transition<F>(prior: Option<&Invoice>, next: Option<&Invoice>, stock_of: F) -> DomainResult<StockDelta>
where
    F: Fn(&ProductId) -> Option<i64>,
{
    if let Some(next) = next {
        check_availability(next, prior, stock_of)?;
    }
    Ok(compute_stock_delta(prior, next))
}
