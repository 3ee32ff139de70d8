use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoiceflow_core::{DomainError, DomainResult, Entity, PurchaseOrderId};
use invoiceflow_inventory::{StockLedger, StockMovement};

/// Purchase order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "pending",
            PurchaseOrderStatus::Approved => "approved",
            PurchaseOrderStatus::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase order line. Products are referenced by *name*, not id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoLine {
    pub product_name: String,
    pub quantity: i64,
    /// Unit cost in smallest currency unit.
    pub cost: u64,
}

impl PoLine {
    pub fn amount(&self) -> DomainResult<u64> {
        let qty = u64::try_from(self.quantity)
            .map_err(|_| DomainError::validation("order line quantity must be positive"))?;
        qty.checked_mul(self.cost)
            .ok_or_else(|| DomainError::invariant("order line amount overflow"))
    }
}

/// Caller-supplied order content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrderDraft {
    pub supplier: String,
    pub date: NaiveDate,
    pub items: Vec<PoLine>,
}

impl PurchaseOrderDraft {
    pub fn new(supplier: impl Into<String>, date: NaiveDate, items: Vec<PoLine>) -> Self {
        Self {
            supplier: supplier.into(),
            date,
            items,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.supplier.trim().is_empty() {
            return Err(DomainError::validation("supplier is required"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation("purchase order needs at least one item"));
        }
        for (idx, line) in self.items.iter().enumerate() {
            if line.product_name.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "line {} has no product name",
                    idx + 1
                )));
            }
            if line.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "line {} quantity must be positive",
                    idx + 1
                )));
            }
        }
        Ok(())
    }
}

/// Purchase order.
///
/// Approval is the only transition with a stock effect and happens at most
/// once: a second approve, or an approve after reject, changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub supplier: String,
    pub items: Vec<PoLine>,
    /// `Σ quantity * cost` at creation.
    pub total_cost: u64,
    pub status: PurchaseOrderStatus,
    pub date: NaiveDate,
}

impl PurchaseOrder {
    pub fn create(id: PurchaseOrderId, draft: PurchaseOrderDraft) -> DomainResult<Self> {
        draft.validate()?;
        let total_cost = draft.items.iter().try_fold(0u64, |acc, line| {
            acc.checked_add(line.amount()?)
                .ok_or_else(|| DomainError::invariant("purchase order total overflow"))
        })?;
        Ok(Self {
            id,
            supplier: draft.supplier.trim().to_string(),
            items: draft.items,
            total_cost,
            status: PurchaseOrderStatus::Pending,
            date: draft.date,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == PurchaseOrderStatus::Pending
    }

    /// Pending -> Approved, crediting each line to every product whose name
    /// matches exactly. Lines with no matching product are dropped.
    ///
    /// Returns the stock movements; empty (and no status change) unless the
    /// order was pending.
    pub fn approve(&mut self, ledger: &mut StockLedger<'_>) -> Vec<StockMovement> {
        if !self.is_pending() {
            tracing::debug!(po_id = %self.id, status = %self.status, "approve ignored; order not pending");
            return Vec::new();
        }
        self.status = PurchaseOrderStatus::Approved;
        // Every line is received, so two lines naming the same product both
        // add stock rather than only the first.
        self.items
            .iter()
            .flat_map(|line| ledger.receive_by_name(&line.product_name, line.quantity))
            .collect()
    }

    /// Pending -> Rejected. Returns whether the status changed.
    pub fn reject(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = PurchaseOrderStatus::Rejected;
        true
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoiceflow_core::ProductId;
    use invoiceflow_inventory::Product;
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn product(id: &str, name: &str, stock: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: String::new(),
            price: 100,
            cost: 50,
            stock,
            sku: String::new(),
            category: None,
            brand: None,
        }
    }

    fn line(name: &str, quantity: i64, cost: u64) -> PoLine {
        PoLine {
            product_name: name.to_string(),
            quantity,
            cost,
        }
    }

    fn order(items: Vec<PoLine>) -> PurchaseOrder {
        PurchaseOrder::create(
            PurchaseOrderId::from("po-1"),
            PurchaseOrderDraft::new("Supplier Co", day(), items),
        )
        .unwrap()
    }

    #[test]
    fn create_starts_pending_and_derives_total_cost() {
        let po = order(vec![line("Wireless Mouse", 10, 1500), line("Cable", 2, 300)]);
        assert_eq!(po.status, PurchaseOrderStatus::Pending);
        assert_eq!(po.total_cost, 10 * 1500 + 2 * 300);
    }

    #[test]
    fn create_requires_supplier_and_lines() {
        let no_supplier = PurchaseOrderDraft::new("", day(), vec![line("Mouse", 1, 1)]);
        assert!(matches!(
            PurchaseOrder::create(PurchaseOrderId::new(), no_supplier),
            Err(DomainError::Validation(_))
        ));

        let empty = PurchaseOrderDraft::new("Supplier Co", day(), vec![]);
        assert!(matches!(
            PurchaseOrder::create(PurchaseOrderId::new(), empty),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn approve_credits_by_name_and_drops_unmatched_lines() {
        let mut products = vec![product("1", "Wireless Mouse", 50)];
        let mut po = order(vec![line("Wireless Mouse", 10, 1500), line("Gadget", 4, 10)]);

        let moved = po.approve(&mut StockLedger::new(&mut products));
        assert_eq!(moved.len(), 1);
        assert_eq!(po.status, PurchaseOrderStatus::Approved);
        assert_eq!(products[0].stock, 60);
    }

    #[test]
    fn approve_after_reject_is_a_no_op() {
        let mut products = vec![product("1", "Wireless Mouse", 50)];
        let mut po = order(vec![line("Wireless Mouse", 10, 1500)]);

        assert!(po.reject());
        assert!(po.approve(&mut StockLedger::new(&mut products)).is_empty());
        assert_eq!(po.status, PurchaseOrderStatus::Rejected);
        assert_eq!(products[0].stock, 50);
        assert!(!po.reject());
    }

    #[test]
    fn shared_name_credits_every_match() {
        let mut products = vec![product("1", "Cable", 1), product("2", "Cable", 2)];
        let mut po = order(vec![line("Cable", 5, 100)]);
        po.approve(&mut StockLedger::new(&mut products));
        assert_eq!(products[0].stock, 6);
        assert_eq!(products[1].stock, 7);
    }

    #[test]
    fn repeated_lines_for_one_name_each_add_stock() {
        let mut products = vec![product("1", "Cable", 10)];
        let mut po = order(vec![line("Cable", 5, 100), line("Cable", 3, 120)]);
        let moved = po.approve(&mut StockLedger::new(&mut products));
        assert_eq!(moved.len(), 2);
        assert_eq!(products[0].stock, 18);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(order(vec![line("Mouse", 1, 1)])).unwrap();
        assert_eq!(json["status"], "pending");
    }

    proptest! {
        /// Property: approving twice has the same stock effect as approving once.
        #[test]
        fn approve_is_idempotent(start in -100i64..100, qty in 1i64..500, extra in 1usize..4) {
            let mut products = vec![product("1", "Wireless Mouse", start)];
            let mut po = order(vec![line("Wireless Mouse", qty, 1500)]);

            po.approve(&mut StockLedger::new(&mut products));
            for _ in 0..extra {
                let moved = po.approve(&mut StockLedger::new(&mut products));
                prop_assert!(moved.is_empty());
            }
            prop_assert_eq!(products[0].stock, start + qty);
        }
    }
}
