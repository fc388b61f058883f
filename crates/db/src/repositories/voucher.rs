use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use vouchery_core::domain::voucher::{Voucher, VoucherId, VoucherType};

use super::{translate_unique_violation, Repository, RepositoryError};
use crate::DbPool;

pub struct SqlVoucherRepository {
    pool: DbPool,
}

impl SqlVoucherRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository<Voucher> for SqlVoucherRepository {
    async fn insert(&self, voucher: Voucher) -> Result<Voucher, RepositoryError> {
        sqlx::query(
            "INSERT INTO vouchers (voucher_id, voucher_type, discount_value) VALUES (?, ?, ?)",
        )
        .bind(voucher.id.0.to_string())
        .bind(voucher.voucher_type.as_str())
        .bind(discount_column(&voucher)?)
        .execute(&self.pool)
        .await
        .map_err(|err| translate_unique_violation(err, voucher.id.0))?;

        Ok(voucher)
    }

    async fn update(&self, voucher: Voucher) -> Result<Voucher, RepositoryError> {
        let result = sqlx::query(
            "UPDATE vouchers SET voucher_type = ?, discount_value = ? WHERE voucher_id = ?",
        )
        .bind(voucher.voucher_type.as_str())
        .bind(discount_column(&voucher)?)
        .bind(voucher.id.0.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(voucher.id.0));
        }

        Ok(voucher)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Voucher>, RepositoryError> {
        let row = sqlx::query(
            "SELECT voucher_id, voucher_type, discount_value FROM vouchers WHERE voucher_id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(voucher_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Voucher>, RepositoryError> {
        let rows = sqlx::query("SELECT voucher_id, voucher_type, discount_value FROM vouchers")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(voucher_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vouchers WHERE voucher_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }
}

fn discount_column(voucher: &Voucher) -> Result<i64, RepositoryError> {
    i64::try_from(voucher.discount_value).map_err(|_| {
        RepositoryError::Decode(format!(
            "discount value {} exceeds the storable range",
            voucher.discount_value
        ))
    })
}

fn voucher_from_row(row: SqliteRow) -> Result<Voucher, RepositoryError> {
    let raw_id: String = row.try_get("voucher_id")?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| RepositoryError::Decode(format!("invalid voucher id `{raw_id}`")))?;

    let raw_type: String = row.try_get("voucher_type")?;
    let voucher_type: VoucherType =
        raw_type.parse().map_err(|err| RepositoryError::Decode(format!("{err}")))?;

    let raw_value: i64 = row.try_get("discount_value")?;
    let discount_value = u64::try_from(raw_value).map_err(|_| {
        RepositoryError::Decode(format!("negative discount value {raw_value} in store"))
    })?;

    Voucher::new(voucher_type, VoucherId(id), discount_value)
        .map_err(|err| RepositoryError::Decode(format!("{err}")))
}
