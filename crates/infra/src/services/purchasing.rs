//! Purchase orders and the returns ledger. Everything here needs `orders`.

use invoiceflow_auth::Capability;
use invoiceflow_core::{DomainError, PurchaseOrderId, ReturnId};
use invoiceflow_inventory::{StockLedger, StockMovement};
use invoiceflow_purchasing::{PurchaseOrder, PurchaseOrderDraft, SalesReturn};

use crate::app::InvoiceFlow;
use crate::error::ServiceResult;

impl InvoiceFlow {
    pub fn list_purchase_orders(&self) -> ServiceResult<&[PurchaseOrder]> {
        self.require(Capability::Orders)?;
        Ok(self.purchase_orders.list())
    }

    /// Record a new `Pending` order. No stock effect until approval.
    pub fn create_purchase_order(&mut self, draft: PurchaseOrderDraft) -> ServiceResult<PurchaseOrder> {
        self.require(Capability::Orders)?;
        let po = PurchaseOrder::create(PurchaseOrderId::new(), draft)?;
        self.purchase_orders.insert(po.clone())?;
        tracing::info!(po_id = %po.id, supplier = %po.supplier, total_cost = po.total_cost, "purchase order created");
        Ok(po)
    }

    /// Approve a pending order and receive its lines into stock by name.
    ///
    /// Approving an order that is no longer pending changes nothing and is
    /// not an error; the returned movements are then empty.
    pub fn approve_purchase_order(&mut self, id: &PurchaseOrderId) -> ServiceResult<Vec<StockMovement>> {
        self.require(Capability::Orders)?;
        let mut po = self
            .purchase_orders
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("purchase order", id))?;
        if !po.is_pending() {
            tracing::debug!(po_id = %id, status = %po.status, "approve ignored");
            return Ok(Vec::new());
        }

        let pending = po.clone();
        let mut products = self.products.list().to_vec();
        let moved = po.approve(&mut StockLedger::new(&mut products));

        self.purchase_orders.update(po)?;
        if let Err(err) = self.products.replace_all(products) {
            if let Err(undo_err) = self.purchase_orders.update(pending) {
                tracing::error!(po_id = %id, error = %undo_err, "stock write failed and the order stays approved");
            }
            return Err(err);
        }
        tracing::info!(po_id = %id, stock_moves = moved.len(), "purchase order approved");
        Ok(moved)
    }

    /// Reject a pending order. Returns whether the status changed.
    pub fn reject_purchase_order(&mut self, id: &PurchaseOrderId) -> ServiceResult<bool> {
        self.require(Capability::Orders)?;
        let mut po = self
            .purchase_orders
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("purchase order", id))?;
        if !po.reject() {
            return Ok(false);
        }
        self.purchase_orders.update(po)?;
        tracing::info!(po_id = %id, "purchase order rejected");
        Ok(true)
    }

    pub fn list_returns(&self) -> ServiceResult<&[SalesReturn]> {
        self.require(Capability::Orders)?;
        Ok(self.returns.list())
    }

    /// Record a return. Neither stock nor the referenced invoice is touched.
    pub fn add_return(&mut self, mut record: SalesReturn) -> ServiceResult<SalesReturn> {
        self.require(Capability::Orders)?;
        if record.id.is_blank() {
            record.id = ReturnId::new();
        }
        record.validate()?;
        self.returns.insert(record.clone())?;
        tracing::info!(return_id = %record.id, invoice_id = %record.invoice_id, "return recorded");
        Ok(record)
    }
}
