//! Invoice create / update / delete with their stock effects.
//!
//! Each operation computes its stock delta up front (validating availability
//! when the result is `Paid`), and only then writes the invoice and applies
//! the delta to the catalog in one replace. A failed check writes nothing;
//! a failed catalog write puts the invoice back as it was.

use invoiceflow_auth::{AuthzError, Capability};
use invoiceflow_core::{DomainError, InvoiceId, ProductId, UserId};
use invoiceflow_inventory::{StockDelta, StockLedger, StockMovement};
use invoiceflow_invoicing::{
    Invoice, InvoiceDraft, InvoiceLine, InvoiceStatus, compute_stock_delta, transition,
};

use crate::app::InvoiceFlow;
use crate::error::{ServiceError, ServiceResult};

impl InvoiceFlow {
    pub fn list_invoices(&self) -> ServiceResult<&[Invoice]> {
        self.require(Capability::Invoices)?;
        Ok(self.invoices.list())
    }

    pub fn get_invoice(&self, id: &InvoiceId) -> ServiceResult<&Invoice> {
        self.require(Capability::Invoices)?;
        self.invoices
            .get(id)
            .ok_or_else(|| DomainError::not_found("invoice", id).into())
    }

    /// Save a new invoice under a fresh id.
    pub fn create_invoice(
        &mut self,
        draft: InvoiceDraft,
        status: InvoiceStatus,
    ) -> ServiceResult<Invoice> {
        self.create_invoice_with_id(InvoiceId::new(), draft, status)
    }

    /// Save a new invoice under a caller-chosen id (`Conflict` if taken).
    pub fn create_invoice_with_id(
        &mut self,
        id: InvoiceId,
        draft: InvoiceDraft,
        status: InvoiceStatus,
    ) -> ServiceResult<Invoice> {
        self.require(Capability::Invoices)?;
        let author = self.acting_user_id()?;

        if self.invoices.contains(&id) {
            return Err(DomainError::conflict(format!("invoice {id} already exists")).into());
        }
        let invoice = Invoice::create(id, draft, status, author)?;
        let delta = transition(None, Some(&invoice), |pid| {
            self.products.get(pid).map(|p| p.stock)
        })?;

        self.invoices.insert(invoice.clone())?;
        let moved = match self.apply_stock_delta(&delta) {
            Ok(moved) => moved,
            Err(err) => {
                let undo = self.invoices.remove(&invoice.id).map(drop);
                return Err(rolled_back(&invoice.id, err, undo));
            }
        };
        tracing::info!(
            invoice_id = %invoice.id,
            status = %invoice.status,
            total = invoice.total,
            stock_moves = moved.len(),
            "invoice created"
        );
        Ok(invoice)
    }

    /// Replace the saved invoice `id` with new content and status.
    ///
    /// Identity and `created_by` are kept from the stored version.
    pub fn update_invoice(
        &mut self,
        id: &InvoiceId,
        draft: InvoiceDraft,
        status: InvoiceStatus,
    ) -> ServiceResult<Invoice> {
        self.require(Capability::Invoices)?;
        let prior = self
            .invoices
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("invoice", id))?;

        let next = prior.revise(draft, status)?;
        let delta = transition(Some(&prior), Some(&next), |pid| {
            self.products.get(pid).map(|p| p.stock)
        })?;

        self.invoices.update(next.clone())?;
        let moved = match self.apply_stock_delta(&delta) {
            Ok(moved) => moved,
            Err(err) => {
                let undo = self.invoices.update(prior).map(drop);
                return Err(rolled_back(id, err, undo));
            }
        };
        tracing::info!(
            invoice_id = %next.id,
            from = %prior.status,
            to = %next.status,
            total = next.total,
            stock_moves = moved.len(),
            "invoice updated"
        );
        Ok(next)
    }

    /// Change only the status, keeping the saved content.
    pub fn set_invoice_status(
        &mut self,
        id: &InvoiceId,
        status: InvoiceStatus,
    ) -> ServiceResult<Invoice> {
        let draft = self.get_invoice(id)?.to_draft();
        self.update_invoice(id, draft, status)
    }

    /// Delete an invoice; a `Paid` one gives its quantities back first.
    pub fn delete_invoice(&mut self, id: &InvoiceId) -> ServiceResult<Invoice> {
        self.require(Capability::Invoices)?;
        let prior = self
            .invoices
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("invoice", id))?;

        let delta = compute_stock_delta(Some(&prior), None);
        let removed = self.invoices.remove(id)?;
        let moved = match self.apply_stock_delta(&delta) {
            Ok(moved) => moved,
            Err(err) => {
                let undo = self.invoices.insert(prior);
                return Err(rolled_back(id, err, undo));
            }
        };
        tracing::info!(
            invoice_id = %removed.id,
            status = %removed.status,
            stock_moves = moved.len(),
            "invoice deleted"
        );
        Ok(removed)
    }

    /// Snapshot a catalog product into an invoice line.
    ///
    /// `price` overrides the product's current sale price.
    pub fn invoice_line(
        &self,
        product_id: &ProductId,
        quantity: i64,
        price: Option<u64>,
    ) -> ServiceResult<InvoiceLine> {
        self.require(Capability::Invoices)?;
        let product = self
            .products
            .get(product_id)
            .ok_or_else(|| DomainError::not_found("product", product_id))?;
        Ok(InvoiceLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            price: price.unwrap_or(product.price),
        })
    }

    fn acting_user_id(&self) -> ServiceResult<UserId> {
        self.current_user()
            .map(|u| u.id.clone())
            .ok_or_else(|| ServiceError::from(AuthzError::Unauthenticated))
    }

    /// Apply a stock delta to the catalog and persist it in one write.
    pub(crate) fn apply_stock_delta(&mut self, delta: &StockDelta) -> ServiceResult<Vec<StockMovement>> {
        if delta.is_empty() {
            return Ok(Vec::new());
        }
        let mut products = self.products.list().to_vec();
        let moved = StockLedger::new(&mut products).apply(delta);
        self.products.replace_all(products)?;
        Ok(moved)
    }
}

/// Report an invoice write that could not be undone, then return `err`.
fn rolled_back(invoice_id: &InvoiceId, err: ServiceError, undo: ServiceResult<()>) -> ServiceError {
    if let Err(undo_err) = undo {
        tracing::error!(
            %invoice_id,
            error = %undo_err,
            "stock write failed and the invoice change could not be undone"
        );
    }
    err
}
