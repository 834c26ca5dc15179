//! # Customer Repository
//!
//! Registered customers. Sales carry a tax-id snapshot, so updates here
//! never affect committed sales.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use copypoint_core::Customer;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

fn map_customer(row: &SqliteRow) -> Result<Customer, sqlx::Error> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Customer {
        id: row.try_get("id")?,
        legal_name: row.try_get("legal_name")?,
        tax_id: row.try_get("tax_id")?,
        vat_condition: row.try_get("vat_condition")?,
        email: row.try_get("email")?,
        address: row.try_get("address")?,
        created_at,
    })
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Customer> {
        let row = sqlx::query(
            "SELECT id, legal_name, tax_id, vat_condition, email, address, created_at
             FROM customers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("customer", id))?;

        Ok(map_customer(&row)?)
    }

    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT id, legal_name, tax_id, vat_condition, email, address, created_at
             FROM customers ORDER BY legal_name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_customer).collect::<Result<_, _>>().map_err(Into::into)
    }

    pub async fn insert(&self, mut customer: Customer) -> DbResult<Customer> {
        let result = sqlx::query(
            "INSERT INTO customers (legal_name, tax_id, vat_condition, email, address, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&customer.legal_name)
        .bind(&customer.tax_id)
        .bind(customer.vat_condition)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        customer.id = result.last_insert_rowid();
        Ok(customer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use copypoint_core::VatCondition;

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let customer = Customer {
            id: 0,
            legal_name: "Papeleria Centro SRL".to_string(),
            tax_id: Some("30-71234567-8".to_string()),
            vat_condition: VatCondition::RegisteredResponsible,
            email: None,
            address: None,
            created_at: Utc::now(),
        };

        let inserted = repo.insert(customer).await.unwrap();
        assert!(inserted.id > 0);

        let found = repo.find_by_id(inserted.id).await.unwrap();
        assert_eq!(found.legal_name, "Papeleria Centro SRL");
        assert_eq!(found.vat_condition, VatCondition::RegisteredResponsible);
    }
}
