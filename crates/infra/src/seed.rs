//! Default collections for a fresh (or unreadable) store.

use invoiceflow_auth::{NewUser, PasswordHasher, Role, User};
use invoiceflow_core::{BrandId, CategoryId, ProductId, UserId};
use invoiceflow_inventory::{Brand, Category, Product};

use crate::error::ServiceResult;

pub const SEED_ADMIN_USERNAME: &str = "admin";
pub const SEED_ADMIN_PASSWORD: &str = "password";

/// One active superadmin, `admin` / `password`.
pub fn users(hasher: &PasswordHasher) -> ServiceResult<Vec<User>> {
    let admin = NewUser::new(SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD, Role::Superadmin)
        .into_user(UserId::from("1"), hasher)?;
    Ok(vec![admin])
}

pub fn products() -> Vec<Product> {
    vec![
        product("1", "Wireless Mouse", "Ergonomic wireless mouse", 2999, 1500, 50, "WM-001", "Electronics", "Logitech"),
        product("2", "Mechanical Keyboard", "RGB mechanical keyboard", 8999, 4500, 15, "MK-002", "Electronics", "Keychron"),
        product("3", "USB-C Monitor", "27 inch 4K Display", 34999, 20000, 8, "MN-003", "Monitors", "Dell"),
    ]
}

pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: CategoryId::from("1"),
            name: "Electronics".to_string(),
        },
        Category {
            id: CategoryId::from("2"),
            name: "Monitors".to_string(),
        },
    ]
}

pub fn brands() -> Vec<Brand> {
    vec![
        Brand {
            id: BrandId::from("1"),
            name: "Logitech".to_string(),
        },
        Brand {
            id: BrandId::from("2"),
            name: "Dell".to_string(),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    price: u64,
    cost: u64,
    stock: i64,
    sku: &str,
    category: &str,
    brand: &str,
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        cost,
        stock,
        sku: sku.to_string(),
        category: Some(category.to_string()),
        brand: Some(brand.to_string()),
    }
}
