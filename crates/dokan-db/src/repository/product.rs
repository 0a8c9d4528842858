//! # Product Repository
//!
//! Current prices for the products the storefront sells. Catalogue content
//! (images, descriptions) lives elsewhere; only what checkout needs to price a
//! cart is stored here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use dokan_core::{validation, ProductPrice, ProductStatus};

/// Repository for product price lookups.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductPriceRow {
    id: String,
    name: String,
    regular_price_poisha: i64,
    sale_price_poisha: Option<i64>,
    status: ProductStatus,
}

impl From<ProductPriceRow> for ProductPrice {
    fn from(row: ProductPriceRow) -> Self {
        ProductPrice {
            product_id: row.id,
            name: row.name,
            regular_price_poisha: row.regular_price_poisha,
            sale_price_poisha: row.sale_price_poisha,
            status: row.status,
        }
    }
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Current price of an active product, or `None` if unknown or retired.
    pub async fn get_price(&self, id: &str) -> DbResult<Option<ProductPrice>> {
        let row = sqlx::query_as::<_, ProductPriceRow>(
            r#"
            SELECT id, name, regular_price_poisha, sale_price_poisha, status
            FROM products
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductPrice::from))
    }

    /// Inserts or replaces a product's price.
    pub async fn upsert(&self, price: &ProductPrice) -> DbResult<()> {
        validation::validate_price_poisha(price.regular_price_poisha)
            .map_err(dokan_core::CoreError::from)?;
        if let Some(sale) = price.sale_price_poisha {
            validation::validate_price_poisha(sale).map_err(dokan_core::CoreError::from)?;
        }

        debug!(id = %price.product_id, status = ?price.status, "Upserting product price");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, regular_price_poisha, sale_price_poisha, status,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                regular_price_poisha = excluded.regular_price_poisha,
                sale_price_poisha = excluded.sale_price_poisha,
                status = excluded.status,
                is_active = 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&price.product_id)
        .bind(&price.name)
        .bind(price.regular_price_poisha)
        .bind(price.sale_price_poisha)
        .bind(price.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts active products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
