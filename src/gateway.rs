// Persistence Gateway - uniform store access for one entity type

use crate::entities::Entity;
use crate::paging::{Page, PageRequest};
use anyhow::Result;

/// Save / find / delete / paginate over the document store.
///
/// Every method fails only on store trouble (I/O, corrupt documents); an
/// absent record is `Ok(None)` and deleting one is `Ok(())`.
pub trait Gateway<E: Entity>: Send + Sync {
    /// Insert when `entity` has no id (one is assigned), otherwise replace the
    /// stored record in full, inserting it under that id if it is unknown.
    fn save(&self, entity: E) -> Result<E>;

    fn find_all(&self, request: &PageRequest) -> Result<Page<E>>;

    fn find_by_id(&self, id: &str) -> Result<Option<E>>;

    fn delete_by_id(&self, id: &str) -> Result<()>;

    fn count(&self) -> Result<u64>;
}
