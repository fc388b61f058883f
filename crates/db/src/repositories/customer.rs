use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use vouchery_core::domain::customer::{Customer, CustomerId};

use super::{translate_unique_violation, Repository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository<Customer> for SqlCustomerRepository {
    async fn insert(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        sqlx::query("INSERT INTO customers (customer_id, name) VALUES (?, ?)")
            .bind(customer.id.0.to_string())
            .bind(&customer.name)
            .execute(&self.pool)
            .await
            .map_err(|err| translate_unique_violation(err, customer.id.0))?;

        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let result = sqlx::query("UPDATE customers SET name = ? WHERE customer_id = ?")
            .bind(&customer.name)
            .bind(customer.id.0.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(customer.id.0));
        }

        Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query("SELECT customer_id, name FROM customers WHERE customer_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(customer_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query("SELECT customer_id, name FROM customers")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(customer_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }
}

fn customer_from_row(row: SqliteRow) -> Result<Customer, RepositoryError> {
    let raw_id: String = row.try_get("customer_id")?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| RepositoryError::Decode(format!("invalid customer id `{raw_id}`")))?;
    let name: String = row.try_get("name")?;

    Ok(Customer::with_id(CustomerId(id), name))
}
