use serde::{Deserialize, Serialize};

use invoiceflow_core::{BrandId, CategoryId, DomainError, DomainResult, Entity, ProductId};

/// Catalog product.
///
/// `stock` is intended to stay non-negative but nothing clamps it: direct
/// edits may set any value and the ledger never floors it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit sale price in smallest currency unit (e.g., cents).
    pub price: u64,
    /// Unit cost in smallest currency unit.
    #[serde(default)]
    pub cost: u64,
    pub stock: i64,
    #[serde(default)]
    pub sku: String,
    /// Category *name* (not id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand *name* (not id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.is_blank() {
            return Err(DomainError::validation("product id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        Ok(())
    }

    /// Stock valued at unit cost. Negative stock lowers the value.
    pub fn valuation(&self) -> i64 {
        let cost = i64::try_from(self.cost).unwrap_or(i64::MAX);
        self.stock.saturating_mul(cost)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Category tag. Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Brand tag. Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
