// Entity Service - seam between the CRUD protocol and the gateway.
// Delegates every call unchanged; business rules would go here.

use crate::entities::Entity;
use crate::gateway::Gateway;
use crate::paging::{Page, PageRequest};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct EntityService<E: Entity> {
    gateway: Arc<dyn Gateway<E>>,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        EntityService {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(gateway: Arc<dyn Gateway<E>>) -> Self {
        EntityService { gateway }
    }

    /// Save an entity, returning the persisted record
    pub fn save(&self, entity: E) -> Result<E> {
        debug!(entity = E::NAME, record = ?entity, "Request to save");
        self.gateway.save(entity)
    }

    /// Get one page of entities
    pub fn find_all(&self, request: &PageRequest) -> Result<Page<E>> {
        debug!(entity = E::NAME, page = request.page, size = request.size, "Request to get all");
        self.gateway.find_all(request)
    }

    pub fn find_one(&self, id: &str) -> Result<Option<E>> {
        debug!(entity = E::NAME, id, "Request to get");
        self.gateway.find_by_id(id)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        debug!(entity = E::NAME, id, "Request to delete");
        self.gateway.delete_by_id(id)?;

        let remaining = self.gateway.count()?;
        debug!(entity = E::NAME, id, remaining, "Deleted");
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        self.gateway.count()
    }
}
