use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use vouchery_core::config::{AppConfig, BackendKind};
use vouchery_core::domain::customer::Customer;
use vouchery_core::domain::voucher::Voucher;

pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, DbPool};
pub use repositories::{
    InMemoryRepository, Repository, RepositoryError, SqlCustomerRepository, SqlVoucherRepository,
};

/// The repository set for one chosen backend, built once at composition
/// time and handed to the (out-of-scope) front-end.
pub struct Repositories {
    pub customers: Arc<dyn Repository<Customer>>,
    pub vouchers: Arc<dyn Repository<Voucher>>,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryRepository::new()),
            vouchers: Arc::new(InMemoryRepository::new()),
        }
    }

    pub fn relational(pool: DbPool) -> Self {
        Self {
            customers: Arc::new(SqlCustomerRepository::new(pool.clone())),
            vouchers: Arc::new(SqlVoucherRepository::new(pool)),
        }
    }

    /// Builds the backend named by the configuration. The relational
    /// variant connects and applies pending migrations before any
    /// repository is handed out.
    pub async fn from_config(config: &AppConfig) -> Result<Self, BuildError> {
        match config.storage.backend {
            BackendKind::Memory => {
                info!(backend = "memory", "storage backend selected");
                Ok(Self::in_memory())
            }
            BackendKind::Relational => {
                let pool = connect(&config.database).await.map_err(BuildError::Connect)?;

                migrations::run_pending(&pool).await.map_err(BuildError::Migration)?;
                info!(backend = "relational", url = %config.database.url, "storage backend selected");
                Ok(Self::relational(pool))
            }
        }
    }
}
