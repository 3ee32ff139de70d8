//! Products, categories and brands. Everything here needs `inventory`.

use invoiceflow_ai::describe_product;
use invoiceflow_auth::Capability;
use invoiceflow_core::{BrandId, CategoryId, DomainError, ProductId};
use invoiceflow_inventory::{Brand, Category, Product};

use crate::app::InvoiceFlow;
use crate::error::ServiceResult;

impl InvoiceFlow {
    pub fn list_products(&self) -> ServiceResult<&[Product]> {
        self.require(Capability::Inventory)?;
        Ok(self.products.list())
    }

    pub fn get_product(&self, id: &ProductId) -> ServiceResult<&Product> {
        self.require(Capability::Inventory)?;
        self.products
            .get(id)
            .ok_or_else(|| DomainError::not_found("product", id).into())
    }

    /// Add a product. A blank id is replaced with a fresh one.
    pub fn add_product(&mut self, mut product: Product) -> ServiceResult<Product> {
        self.require(Capability::Inventory)?;
        if product.id.is_blank() {
            product.id = ProductId::new();
        }
        product.name = product.name.trim().to_string();
        product.validate()?;
        self.products.insert(product.clone())?;
        tracing::info!(product_id = %product.id, name = %product.name, "product added");
        Ok(product)
    }

    /// Wholesale edit, stock included. Any stock value is accepted.
    pub fn update_product(&mut self, mut product: Product) -> ServiceResult<Product> {
        self.require(Capability::Inventory)?;
        product.name = product.name.trim().to_string();
        product.validate()?;
        let previous = self.products.update(product)?;
        tracing::info!(product_id = %previous.id, "product updated");
        Ok(previous)
    }

    /// Delete a product. Invoices that reference it keep their line snapshots.
    pub fn delete_product(&mut self, id: &ProductId) -> ServiceResult<Product> {
        self.require(Capability::Inventory)?;
        let removed = self.products.remove(id)?;
        tracing::info!(product_id = %removed.id, "product deleted");
        Ok(removed)
    }

    pub fn list_categories(&self) -> ServiceResult<&[Category]> {
        self.require(Capability::Inventory)?;
        Ok(self.categories.list())
    }

    pub fn add_category(&mut self, name: &str) -> ServiceResult<Category> {
        self.require(Capability::Inventory)?;
        let category = Category {
            id: CategoryId::new(),
            name: tag_name(name, "category")?,
        };
        self.categories.insert(category.clone())?;
        tracing::info!(category = %category.name, "category added");
        Ok(category)
    }

    pub fn delete_category(&mut self, id: &CategoryId) -> ServiceResult<Category> {
        self.require(Capability::Inventory)?;
        Ok(self.categories.remove(id)?)
    }

    pub fn list_brands(&self) -> ServiceResult<&[Brand]> {
        self.require(Capability::Inventory)?;
        Ok(self.brands.list())
    }

    pub fn add_brand(&mut self, name: &str) -> ServiceResult<Brand> {
        self.require(Capability::Inventory)?;
        let brand = Brand {
            id: BrandId::new(),
            name: tag_name(name, "brand")?,
        };
        self.brands.insert(brand.clone())?;
        tracing::info!(brand = %brand.name, "brand added");
        Ok(brand)
    }

    pub fn delete_brand(&mut self, id: &BrandId) -> ServiceResult<Brand> {
        self.require(Capability::Inventory)?;
        Ok(self.brands.remove(id)?)
    }

    /// Generated marketing copy for a product name, or a fixed fallback.
    pub fn describe_product(&self, name: &str) -> ServiceResult<String> {
        self.require(Capability::Inventory)?;
        Ok(describe_product(self.generator.as_deref(), name))
    }
}

fn tag_name(name: &str, kind: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation(format!("{kind} name cannot be empty")).into());
    }
    Ok(name.to_string())
}
