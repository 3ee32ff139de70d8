use serde::{Deserialize, Serialize};

use invoiceflow_core::money::format_cents;

use crate::generator::{Fallbacks, TextGenerator, complete};

const FALLBACKS: Fallbacks = Fallbacks {
    not_configured: "AI Configuration Missing",
    failed: "Could not analyze data at this moment.",
    empty: "No insights available.",
};

/// Products below this stock count as "low" in the insight summary.
///
/// Independent of the dashboard threshold.
pub const LOW_STOCK_BELOW: i64 = 5;

/// How many highest-stock product names go into the summary.
pub const TOP_PRODUCTS: usize = 3;

/// Aggregate numbers handed to the generator. No customer data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSummary {
    /// Σ total over *all* invoices, whatever their status.
    pub total_revenue: u64,
    pub invoice_count: usize,
    pub low_stock_count: usize,
    pub top_products: Vec<String>,
}

impl BusinessSummary {
    /// Build from invoice totals and `(product name, stock)` pairs.
    ///
    /// Ties in stock keep the order the products were given in.
    pub fn collect<'a>(
        invoice_totals: impl IntoIterator<Item = u64>,
        products: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Self {
        let (total_revenue, invoice_count) = invoice_totals
            .into_iter()
            .fold((0u64, 0usize), |(sum, n), t| (sum.saturating_add(t), n + 1));

        let mut products: Vec<(&str, i64)> = products.into_iter().collect();
        let low_stock_count = products.iter().filter(|(_, s)| *s < LOW_STOCK_BELOW).count();
        products.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            total_revenue,
            invoice_count,
            low_stock_count,
            top_products: products
                .into_iter()
                .take(TOP_PRODUCTS)
                .map(|(name, _)| name.to_string())
                .collect(),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Analyze this business data:\n\
             Total Revenue: ${}\n\
             Invoices Issued: {}\n\
             Low Stock Items: {}\n\
             High Stock Products: {}\n\n\
             Provide 3 brief, actionable insights or tips for the business owner in a friendly tone.\n\
             Focus on inventory optimization and sales growth.",
            format_cents(self.total_revenue),
            self.invoice_count,
            self.low_stock_count,
            self.top_products.join(", "),
        )
    }
}

/// A few actionable tips for the business owner. Never fails.
pub fn business_insights(generator: Option<&dyn TextGenerator>, summary: &BusinessSummary) -> String {
    complete(generator, &summary.prompt(), &FALLBACKS)
}
