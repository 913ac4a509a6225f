//! # First-Access Seeding
//!
//! Defaults written the first time a collection is read:
//!
//! - `products` → three sample products, so a fresh profile has a
//!   browsable catalog
//! - `admin` → the single operator record with the well-known default
//!   credentials
//!
//! Seeds are persisted on first access so generated ids stay stable
//! across reads.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use kolysanka_core::{AdminUser, Category, Money, Product};

use crate::error::StoreResult;
use crate::service::session::hash_password;

/// Username of the seeded operator account.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Well-known default password of the seeded operator account.
///
/// First-run login uses it; rotate via `SessionService::change_password`.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Builds the three sample catalog products.
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    vec![
        Product {
            id: Uuid::new_v4().to_string(),
            name: "Милий комбінезон для новонароджених".to_string(),
            description: "М'який та зручний комбінезон з натуральної бавовни для найменших"
                .to_string(),
            price: Money::from_major(450),
            images: vec![],
            category: Category::Newborn,
            sizes: vec!["0-3m".to_string(), "3-6m".to_string(), "6-12m".to_string()],
            colors: vec![
                "білий".to_string(),
                "рожевий".to_string(),
                "синій".to_string(),
            ],
            in_stock: true,
            stock_quantity: 15,
            created_at: now,
            updated_at: now,
        },
        Product {
            id: Uuid::new_v4().to_string(),
            name: "Світшот для хлопчиків".to_string(),
            description: "Стильний світшот з капюшоном для активних хлопчиків".to_string(),
            price: Money::from_major(650),
            images: vec![],
            category: Category::Boys,
            sizes: vec![
                "2-3y".to_string(),
                "3-4y".to_string(),
                "4-5y".to_string(),
                "5-6y".to_string(),
            ],
            colors: vec![
                "синій".to_string(),
                "сірий".to_string(),
                "зелений".to_string(),
            ],
            in_stock: true,
            stock_quantity: 20,
            created_at: now,
            updated_at: now,
        },
        Product {
            id: Uuid::new_v4().to_string(),
            name: "Плаття для дівчинки".to_string(),
            description: "Красиве святкове плаття з мереживом".to_string(),
            price: Money::from_major(850),
            images: vec![],
            category: Category::Girls,
            sizes: vec![
                "2-3y".to_string(),
                "3-4y".to_string(),
                "4-5y".to_string(),
                "5-6y".to_string(),
            ],
            colors: vec![
                "рожевий".to_string(),
                "білий".to_string(),
                "фіолетовий".to_string(),
            ],
            in_stock: true,
            stock_quantity: 12,
            created_at: now,
            updated_at: now,
        },
    ]
}

/// Builds the default operator record.
///
/// Only the Argon2 hash of the default password is stored.
pub fn default_admin() -> StoreResult<AdminUser> {
    Ok(AdminUser {
        id: Uuid::new_v4().to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_products_are_valid() {
        let now = Utc::now();
        let products = sample_products(now);

        assert_eq!(products.len(), 3);
        for product in &products {
            assert!(product.price.is_positive());
            assert!(!product.sizes.is_empty());
            assert!(!product.colors.is_empty());
            assert!(product.in_stock);
            assert_eq!(product.created_at, product.updated_at);
        }

        // Ids are unique
        assert_ne!(products[0].id, products[1].id);
        assert_ne!(products[1].id, products[2].id);
    }

    #[test]
    fn test_default_admin_stores_hash_not_plaintext() {
        let admin = default_admin().unwrap();

        assert_eq!(admin.username, "admin");
        assert_ne!(admin.password_hash, DEFAULT_ADMIN_PASSWORD);
        assert!(admin.password_hash.starts_with("$argon2"));
    }
}
