//! # Discount Code Repository
//!
//! ## Usage Counter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  increment_usage(id)                                                    │
//! │                                                                         │
//! │  UPDATE discount_codes                                                  │
//! │  SET current_usage_count = current_usage_count + 1                      │
//! │  WHERE id = ? AND current_usage_count < max_usage_count                 │
//! │  RETURNING current_usage_count                                          │
//! │       │                                                                 │
//! │       ├── 1 row  ──► Ok(new_count)                                      │
//! │       └── 0 rows ──► id exists?  ── yes ──► UsageCapReached             │
//! │                                  └─ no  ──► NotFound                    │
//! │                                                                         │
//! │  The read-check-write happens inside one statement, so two requests     │
//! │  racing at max-1 end at exactly max: one wins, one gets                 │
//! │  UsageCapReached. The counter never decreases.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes are matched case-sensitively (`"SAVE10" != "save10"`).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dokan_core::{validation, CoreError, DiscountCode, NewDiscountCode};

/// Repository for discount code operations.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct DiscountCodeRow {
    id: String,
    code: String,
    name: String,
    percentage_off: i64,
    max_usage_count: i64,
    current_usage_count: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
}

impl DiscountCodeRow {
    fn into_discount(self, applicable_product_ids: Vec<String>) -> DbResult<DiscountCode> {
        let percentage_off = u8::try_from(self.percentage_off).map_err(|_| {
            DbError::CorruptRow(format!(
                "discount_codes.percentage_off = {} for {}",
                self.percentage_off, self.id
            ))
        })?;

        Ok(DiscountCode {
            id: self.id,
            code: self.code,
            name: self.name,
            percentage_off,
            max_usage_count: self.max_usage_count,
            current_usage_count: self.current_usage_count,
            start_date: self.start_date,
            end_date: self.end_date,
            applicable_product_ids,
            is_active: self.is_active,
        })
    }
}

const SELECT_DISCOUNT: &str = r#"
    SELECT id, code, name, percentage_off, max_usage_count, current_usage_count,
           start_date, end_date, is_active
    FROM discount_codes
"#;

impl DiscountRepository {
    /// Creates a new DiscountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    /// Looks up a code by its exact text. Inactive codes are returned too;
    /// rejecting them is a pricing decision.
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        let row = sqlx::query_as::<_, DiscountCodeRow>(&format!("{SELECT_DISCOUNT} WHERE code = ?1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let product_ids = self.product_ids(&row.id).await?;
                Ok(Some(row.into_discount(product_ids)?))
            }
            None => Ok(None),
        }
    }

    /// Gets a code by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DiscountCode>> {
        let row = sqlx::query_as::<_, DiscountCodeRow>(&format!("{SELECT_DISCOUNT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let product_ids = self.product_ids(&row.id).await?;
                Ok(Some(row.into_discount(product_ids)?))
            }
            None => Ok(None),
        }
    }

    /// All codes, newest first, with their product restrictions.
    pub async fn list(&self) -> DbResult<Vec<DiscountCode>> {
        let rows = sqlx::query_as::<_, DiscountCodeRow>(&format!(
            "{SELECT_DISCOUNT} ORDER BY created_at DESC, code ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let links: Vec<(String, String)> = sqlx::query_as(
            "SELECT discount_code_id, product_id FROM discount_code_products ORDER BY product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_code: HashMap<String, Vec<String>> = HashMap::new();
        for (code_id, product_id) in links {
            by_code.entry(code_id).or_default().push(product_id);
        }

        rows.into_iter()
            .map(|row| {
                let ids = by_code.remove(&row.id).unwrap_or_default();
                row.into_discount(ids)
            })
            .collect()
    }

    /// Creates a code and its product restrictions in one transaction.
    ///
    /// ## Errors
    /// - `Domain` if the definition fails validation
    /// - `UniqueViolation { field: "code" }` if the code text is taken
    pub async fn create(&self, new: &NewDiscountCode) -> DbResult<DiscountCode> {
        validation::validate_discount_definition(new).map_err(CoreError::from)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, code = %new.code, percentage_off = new.percentage_off, "Creating discount code");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO discount_codes (
                id, code, name, percentage_off, max_usage_count, current_usage_count,
                start_date, end_date, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&id)
        .bind(&new.code)
        .bind(&new.name)
        .bind(i64::from(new.percentage_off))
        .bind(new.max_usage_count)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("code", new.code.clone()),
            other => other,
        })?;

        let mut product_ids = new.applicable_product_ids.clone();
        product_ids.sort();
        product_ids.dedup();

        for product_id in &product_ids {
            sqlx::query(
                "INSERT INTO discount_code_products (discount_code_id, product_id) VALUES (?1, ?2)",
            )
            .bind(&id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(DiscountCode {
            id,
            code: new.code.clone(),
            name: new.name.clone(),
            percentage_off: new.percentage_off,
            max_usage_count: new.max_usage_count,
            current_usage_count: 0,
            start_date: new.start_date,
            end_date: new.end_date,
            applicable_product_ids: product_ids,
            is_active: new.is_active,
        })
    }

    /// Activates or deactivates a code. The usage counter is untouched.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id = %id, active, "Setting discount code active flag");

        let result = sqlx::query(
            "UPDATE discount_codes SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiscountCode", id));
        }

        Ok(())
    }

    /// Atomically adds one use, refusing to pass `max_usage_count`.
    ///
    /// Returns the new `current_usage_count`.
    pub async fn increment_usage(&self, id: &str) -> DbResult<i64> {
        debug!(id = %id, "Incrementing discount usage");

        let new_count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE discount_codes
            SET current_usage_count = current_usage_count + 1,
                updated_at = ?2
            WHERE id = ?1 AND current_usage_count < max_usage_count
            RETURNING current_usage_count
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(count) = new_count {
            return Ok(count);
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM discount_codes WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Err(DbError::UsageCapReached(id.to_string())),
            None => Err(DbError::not_found("DiscountCode", id)),
        }
    }

    async fn product_ids(&self, discount_id: &str) -> DbResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT product_id FROM discount_code_products WHERE discount_code_id = ?1 ORDER BY product_id",
        )
        .bind(discount_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
