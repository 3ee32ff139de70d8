use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use invoiceflow_core::{DomainError, DomainResult, Entity, InvoiceId, ProductId, UserId};

/// Invoice status lifecycle.
///
/// Only `Paid` holds stock. `Cancelled` is an authoring choice with no stock
/// effect of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn holds_stock(&self) -> bool {
        matches!(self, InvoiceStatus::Paid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" | "canceled" => Ok(InvoiceStatus::Cancelled),
            other => Err(format!("unknown invoice status '{other}'")),
        }
    }
}

/// Invoice line: a snapshot of product name and unit price at selection time.
///
/// Later catalog price changes do not flow into saved lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
}

impl InvoiceLine {
    pub fn amount(&self) -> DomainResult<u64> {
        let qty = u64::try_from(self.quantity)
            .map_err(|_| DomainError::validation("invoice line quantity must be positive"))?;
        qty.checked_mul(self.price)
            .ok_or_else(|| DomainError::invariant("invoice line amount overflow"))
    }
}

/// Caller-supplied invoice content. Totals are never taken from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub date: NaiveDate,
    /// `None` means one week after `date`.
    pub due_date: Option<NaiveDate>,
    pub items: Vec<InvoiceLine>,
    pub notes: Option<String>,
}

impl InvoiceDraft {
    pub fn new(customer_name: impl Into<String>, date: NaiveDate, items: Vec<InvoiceLine>) -> Self {
        Self {
            customer_name: customer_name.into(),
            date,
            due_date: None,
            items,
            notes: None,
        }
    }

    /// Required fields: customer name and at least one well-formed line.
    pub fn validate(&self) -> DomainResult<()> {
        if self.customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation("invoice needs at least one item"));
        }
        for (idx, line) in self.items.iter().enumerate() {
            if line.product_id.is_blank() {
                return Err(DomainError::validation(format!(
                    "line {} has no product selected",
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

    fn resolved_due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or_else(|| {
            self.date
                .checked_add_days(Days::new(7))
                .unwrap_or(self.date)
        })
    }
}

/// Customer invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_name: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceLine>,
    /// Always `Σ quantity * price` of `items` as of the last save.
    pub total: u64,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_by: UserId,
}

impl Invoice {
    /// Build a new invoice from a validated draft, deriving the total.
    pub fn create(
        id: InvoiceId,
        draft: InvoiceDraft,
        status: InvoiceStatus,
        created_by: UserId,
    ) -> DomainResult<Self> {
        draft.validate()?;
        let total = recompute_total(&draft.items)?;
        let due_date = draft.resolved_due_date();
        Ok(Self {
            id,
            customer_name: draft.customer_name.trim().to_string(),
            date: draft.date,
            due_date,
            items: draft.items,
            total,
            status,
            notes: draft.notes.filter(|n| !n.trim().is_empty()),
            created_by,
        })
    }

    /// The next saved version of this invoice. Identity and author are kept.
    pub fn revise(&self, draft: InvoiceDraft, status: InvoiceStatus) -> DomainResult<Self> {
        Self::create(self.id.clone(), draft, status, self.created_by.clone())
    }

    /// Editable content of this invoice, e.g. to tweak one field and re-save.
    pub fn to_draft(&self) -> InvoiceDraft {
        InvoiceDraft {
            customer_name: self.customer_name.clone(),
            date: self.date,
            due_date: Some(self.due_date),
            items: self.items.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status.holds_stock()
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// `Σ quantity * price` over the lines, with overflow checks.
pub fn recompute_total(items: &[InvoiceLine]) -> DomainResult<u64> {
    items.iter().try_fold(0u64, |acc, line| {
        acc.checked_add(line.amount()?)
            .ok_or_else(|| DomainError::invariant("invoice total overflow"))
    })
}
