//! Dashboard, financial report, billing summary and AI insights.

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;

use invoiceflow_ai::{BusinessSummary, business_insights};
use invoiceflow_auth::Capability;
use invoiceflow_core::ProductId;
use invoiceflow_inventory::Product;
use invoiceflow_invoicing::Invoice;

use crate::app::InvoiceFlow;
use crate::error::ServiceResult;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Landing-page figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Σ total over `Paid` invoices.
    pub total_revenue: u64,
    pub invoice_count: usize,
    /// Products with `stock < threshold`.
    pub low_stock_count: usize,
    pub low_stock_threshold: i64,
    /// Σ total over *all* invoices per calendar month, Jan..Dec, any year.
    pub revenue_by_month: [u64; 12],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialReport {
    /// Σ total over `Paid` invoices.
    pub revenue: u64,
    /// Σ current product cost × quantity over `Paid` invoice lines.
    pub cost_of_goods_sold: u64,
    /// `revenue - cost_of_goods_sold`; negative when selling below cost.
    pub gross_profit: i64,
    /// Σ stock × cost over the catalog; negative stock counts against it.
    pub inventory_valuation: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    pub plan: &'static str,
    pub users: usize,
    pub products: usize,
    pub invoices: usize,
}

pub const PLAN_NAME: &str = "Pro Business Plan";

pub fn dashboard_stats(invoices: &[Invoice], products: &[Product], low_stock_threshold: i64) -> DashboardStats {
    let mut revenue_by_month = [0u64; 12];
    for invoice in invoices {
        let month = invoice.date.month0() as usize;
        revenue_by_month[month] = revenue_by_month[month].saturating_add(invoice.total);
    }

    DashboardStats {
        total_revenue: paid_revenue(invoices),
        invoice_count: invoices.len(),
        low_stock_count: products
            .iter()
            .filter(|p| p.stock < low_stock_threshold)
            .count(),
        low_stock_threshold,
        revenue_by_month,
    }
}

pub fn financial_report(invoices: &[Invoice], products: &[Product]) -> FinancialReport {
    let cost_of: HashMap<&ProductId, u64> = products.iter().map(|p| (&p.id, p.cost)).collect();

    let revenue = paid_revenue(invoices);
    let cost_of_goods_sold = invoices
        .iter()
        .filter(|inv| inv.is_paid())
        .flat_map(|inv| inv.items.iter())
        .filter_map(|line| {
            let cost = cost_of.get(&line.product_id)?;
            let qty = u64::try_from(line.quantity).ok()?;
            Some(cost.saturating_mul(qty))
        })
        .fold(0u64, u64::saturating_add);

    FinancialReport {
        revenue,
        cost_of_goods_sold,
        gross_profit: signed(revenue) - signed(cost_of_goods_sold),
        inventory_valuation: products
            .iter()
            .map(Product::valuation)
            .fold(0i64, i64::saturating_add),
    }
}

fn paid_revenue(invoices: &[Invoice]) -> u64 {
    invoices
        .iter()
        .filter(|inv| inv.is_paid())
        .map(|inv| inv.total)
        .fold(0u64, u64::saturating_add)
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl InvoiceFlow {
    /// Available to any active user.
    pub fn dashboard(&self) -> ServiceResult<DashboardStats> {
        self.require_active()?;
        Ok(dashboard_stats(
            self.invoices.list(),
            self.products.list(),
            self.low_stock_threshold,
        ))
    }

    pub fn financial_report(&self) -> ServiceResult<FinancialReport> {
        self.require(Capability::Reports)?;
        Ok(financial_report(self.invoices.list(), self.products.list()))
    }

    /// Superadmin only.
    pub fn billing_summary(&self) -> ServiceResult<BillingSummary> {
        self.require(Capability::Billing)?;
        Ok(BillingSummary {
            plan: PLAN_NAME,
            users: self.users.list().len(),
            products: self.products.list().len(),
            invoices: self.invoices.list().len(),
        })
    }

    pub fn insights_summary(&self) -> ServiceResult<BusinessSummary> {
        self.require(Capability::Reports)?;
        Ok(BusinessSummary::collect(
            self.invoices.list().iter().map(|inv| inv.total),
            self.products.list().iter().map(|p| (p.name.as_str(), p.stock)),
        ))
    }

    /// Generated tips for the owner, or a fixed fallback.
    pub fn business_insights(&self) -> ServiceResult<String> {
        let summary = self.insights_summary()?;
        Ok(business_insights(self.generator.as_deref(), &summary))
    }
}
