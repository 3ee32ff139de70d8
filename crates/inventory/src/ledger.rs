//! Stock ledger: the only code that writes `Product::stock`.

use std::collections::BTreeMap;

use invoiceflow_core::ProductId;

use crate::Product;

/// Signed stock change per product (positive = stock goes up).
pub type StockDelta = BTreeMap<ProductId, i64>;

/// One applied stock change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: ProductId,
    pub delta: i64,
    pub new_stock: i64,
}

/// Ledger view over a mutable product list.
///
/// Unknown product ids are ignored rather than reported, and stock is never
/// clamped in either direction.
#[derive(Debug)]
pub struct StockLedger<'a> {
    products: &'a mut [Product],
}

impl<'a> StockLedger<'a> {
    pub fn new(products: &'a mut [Product]) -> Self {
        Self { products }
    }

    pub fn stock_of(&self, product_id: &ProductId) -> Option<i64> {
        self.products
            .iter()
            .find(|p| &p.id == product_id)
            .map(|p| p.stock)
    }

    /// Take `quantity` out of stock. Returns `false` if the product is unknown.
    pub fn deduct(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        self.adjust(product_id, -quantity).is_some()
    }

    /// Put `quantity` back into stock. Returns `false` if the product is unknown.
    pub fn restore(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        self.adjust(product_id, quantity).is_some()
    }

    /// Apply a whole delta map, returning the movements that hit a product.
    pub fn apply(&mut self, delta: &StockDelta) -> Vec<StockMovement> {
        delta
            .iter()
            .filter(|(_, d)| **d != 0)
            .filter_map(|(id, d)| {
                self.adjust(id, *d).map(|new_stock| StockMovement {
                    product_id: id.clone(),
                    delta: *d,
                    new_stock,
                })
            })
            .collect()
    }

    /// Credit every product whose name equals `name` exactly.
    ///
    /// Returns the movements; empty when no product carries that name.
    pub fn receive_by_name(&mut self, name: &str, quantity: i64) -> Vec<StockMovement> {
        let mut movements = Vec::new();
        for product in self.products.iter_mut().filter(|p| p.name == name) {
            product.stock = product.stock.saturating_add(quantity);
            movements.push(StockMovement {
                product_id: product.id.clone(),
                delta: quantity,
                new_stock: product.stock,
            });
        }
        if movements.is_empty() {
            tracing::debug!(product_name = name, quantity, "no product matches name; line dropped");
        }
        movements
    }

    fn adjust(&mut self, product_id: &ProductId, delta: i64) -> Option<i64> {
        match self.products.iter_mut().find(|p| &p.id == product_id) {
            Some(product) => {
                product.stock = product.stock.saturating_add(delta);
                Some(product.stock)
            }
            None => {
                tracing::debug!(%product_id, delta, "unknown product; stock adjustment ignored");
                None
            }
        }
    }
}
