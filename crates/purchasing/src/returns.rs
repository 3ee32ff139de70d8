use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoiceflow_core::{DomainError, DomainResult, Entity, InvoiceId, ReturnId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Pending,
    Processed,
}

impl core::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ReturnStatus::Pending => "pending",
            ReturnStatus::Processed => "processed",
        })
    }
}

/// A recorded customer return.
///
/// Passive: recording one touches neither stock nor the referenced invoice,
/// and `invoice_id` is not checked against existing invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReturn {
    pub id: ReturnId,
    pub invoice_id: InvoiceId,
    pub reason: String,
    pub date: NaiveDate,
    pub status: ReturnStatus,
    /// Refund in smallest currency unit.
    pub refund_amount: u64,
}

impl SalesReturn {
    pub fn validate(&self) -> DomainResult<()> {
        if self.invoice_id.is_blank() {
            return Err(DomainError::validation("return must reference an invoice"));
        }
        Ok(())
    }
}

impl Entity for SalesReturn {
    type Id = ReturnId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
