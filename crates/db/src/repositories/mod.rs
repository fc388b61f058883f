use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use vouchery_core::domain::customer::Customer;
use vouchery_core::domain::voucher::Voucher;

pub mod customer;
pub mod memory;
pub mod voucher;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryRepository;
pub use voucher::SqlVoucherRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity with id {0} already exists")]
    AlreadyExists(Uuid),
    #[error("entity with id {0} does not exist")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Maps a primary-key violation onto the contract's duplicate-id error;
/// every other store failure propagates untranslated.
pub(crate) fn translate_unique_violation(err: sqlx::Error, id: Uuid) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::AlreadyExists(id);
        }
    }
    RepositoryError::Database(err)
}

/// A persistable record keyed by its uuid. The repository contract is
/// identical for every implementor; only the stored attribute set differs.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

impl Entity for Customer {
    fn id(&self) -> Uuid {
        self.id.0
    }
}

impl Entity for Voucher {
    fn id(&self) -> Uuid {
        self.id.0
    }
}

/// Uniform CRUD contract shared by the in-memory and relational backends.
///
/// * `insert` rejects a duplicate id with [`RepositoryError::AlreadyExists`]
///   and otherwise returns the stored value unchanged.
/// * `update` replaces the stored record wholesale and rejects an absent id
///   with [`RepositoryError::NotFound`], as does `delete`.
/// * `find_by_id` and `find_all` treat absence as an empty result, never as
///   an error.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn insert(&self, entity: T) -> Result<T, RepositoryError>;

    async fn update(&self, entity: T) -> Result<T, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<T>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
