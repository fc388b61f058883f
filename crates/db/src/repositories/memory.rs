use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Entity, Repository, RepositoryError};

/// Map-backed repository for development and testing. Satisfies the exact
/// contract of [`Repository`] with no persistence across restarts.
#[derive(Default)]
pub struct InMemoryRepository<T> {
    entities: RwLock<HashMap<Uuid, T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self { entities: RwLock::new(HashMap::new()) }
    }
}

#[async_trait::async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn insert(&self, entity: T) -> Result<T, RepositoryError> {
        let mut entities = self.entities.write().await;
        if entities.contains_key(&entity.id()) {
            return Err(RepositoryError::AlreadyExists(entity.id()));
        }
        tracing::debug!(id = %entity.id(), "insert entity");
        entities.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepositoryError> {
        let mut entities = self.entities.write().await;
        if !entities.contains_key(&entity.id()) {
            return Err(RepositoryError::NotFound(entity.id()));
        }
        entities.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepositoryError> {
        let entities = self.entities.read().await;
        Ok(entities.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepositoryError> {
        let entities = self.entities.read().await;
        Ok(entities.values().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut entities = self.entities.write().await;
        match entities.remove(&id) {
            Some(_) => {
                tracing::debug!(%id, "delete entity");
                Ok(())
            }
            None => Err(RepositoryError::NotFound(id)),
        }
    }
}
