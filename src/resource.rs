// CRUD protocol - the rules every REST resource follows, independent of HTTP
//
//   create: no id allowed, required fields present  -> Created + location
//   update: id missing  -> same as create
//           id empty    -> rejected
//           id present  -> full replacement          -> Updated
//   list:   never rejects; unknown sort fields do not affect ordering
//   get:    absent record is Ok(None), not an error
//   delete: always succeeds, present or not
//
// Rejections happen before the service is called, so they never write.

use crate::entities::Entity;
use crate::error::{CrudError, CrudResult};
use crate::paging::{Page, PageRequest};
use crate::schema::{SchemaValidator, ValidationError};
use crate::service::EntityService;
use tracing::debug;

/// Outcome of a successful create or update
#[derive(Debug, Clone, PartialEq)]
pub enum Saved<E> {
    Created { entity: E, location: String },
    Updated(E),
}

impl<E> Saved<E> {
    pub fn entity(&self) -> &E {
        match self {
            Saved::Created { entity, .. } => entity,
            Saved::Updated(entity) => entity,
        }
    }

    #[cfg(test)]
    pub fn into_entity(self) -> E {
        match self {
            Saved::Created { entity, .. } => entity,
            Saved::Updated(entity) => entity,
        }
    }
}

pub struct Resource<E: Entity> {
    service: EntityService<E>,
    base_path: String,
}

impl<E: Entity> Clone for Resource<E> {
    fn clone(&self) -> Self {
        Resource {
            service: self.service.clone(),
            base_path: self.base_path.clone(),
        }
    }
}

impl<E: Entity> Resource<E> {
    pub fn new(service: EntityService<E>) -> Self {
        Resource {
            service,
            base_path: format!("/api/{}", E::RESOURCE),
        }
    }

    /// Collection path, e.g. `/api/customers`
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn location_of(&self, id: &str) -> String {
        format!("{}/{}", self.base_path, urlencoding::encode(id))
    }

    pub fn create(&self, candidate: E) -> CrudResult<Saved<E>> {
        debug!(entity = E::NAME, record = ?candidate, "REST request to save");

        if candidate.id().is_some() {
            return Err(CrudError::validation(
                E::NAME,
                "idexists",
                vec![ValidationError::new(
                    E::NAME,
                    "id",
                    format!("A new {} cannot already have an ID", E::NAME),
                )],
            ));
        }
        Self::check_required(&candidate)?;

        let entity = self.service.save(candidate)?;
        let id = entity
            .id()
            .ok_or_else(|| anyhow::anyhow!("Store returned {} without an id", E::NAME))?;
        let location = self.location_of(id);

        Ok(Saved::Created { entity, location })
    }

    pub fn update(&self, candidate: E) -> CrudResult<Saved<E>> {
        debug!(entity = E::NAME, record = ?candidate, "REST request to update");

        if candidate.id().is_none() {
            return self.create(candidate);
        }
        if candidate.id() == Some("") {
            return Err(CrudError::validation(
                E::NAME,
                "idnull",
                vec![ValidationError::new(E::NAME, "id", "Invalid id")],
            ));
        }
        Self::check_required(&candidate)?;

        Ok(Saved::Updated(self.service.save(candidate)?))
    }

    pub fn list(&self, request: &PageRequest) -> CrudResult<Page<E>> {
        debug!(entity = E::NAME, "REST request to get a page");
        Ok(self.service.find_all(request)?)
    }

    pub fn get(&self, id: &str) -> CrudResult<Option<E>> {
        debug!(entity = E::NAME, id, "REST request to get");
        Ok(self.service.find_one(id)?)
    }

    pub fn delete(&self, id: &str) -> CrudResult<()> {
        debug!(entity = E::NAME, id, "REST request to delete");
        Ok(self.service.delete(id)?)
    }

    fn check_required(candidate: &E) -> CrudResult<()> {
        SchemaValidator::validate(candidate)
            .map_err(|errors| CrudError::validation(E::NAME, "validation", errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_database, SqliteGateway};
    use crate::entities::{CheckingAccount, Customer, Transaction, TransactionKind};
    use crate::paging::Direction;
    use std::sync::{Arc, Mutex};

    fn resource<E: Entity>() -> Resource<E> {
        let conn = Arc::new(Mutex::new(open_database(":memory:").unwrap()));
        Resource::new(EntityService::new(Arc::new(SqliteGateway::<E>::new(conn))))
    }

    fn default_customer() -> Customer {
        Customer {
            id: None,
            name: Some("AAAAA".to_string()),
            tax_id: Some("AAAAA".to_string()),
            birth_date: chrono::NaiveDate::from_ymd_opt(1970, 1, 1),
        }
    }

    fn count<E: Entity>(resource: &Resource<E>) -> u64 {
        resource.service.count().unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_location() {
        let customers = resource::<Customer>();

        let saved = customers.create(default_customer()).unwrap();
        let Saved::Created { entity, location } = saved else {
            panic!("create must report Created");
        };

        let id = entity.id.clone().unwrap();
        assert_eq!(location, format!("/api/customers/{}", id));

        let fetched = customers.get(&id).unwrap().unwrap();
        assert_eq!(Customer { id: None, ..fetched }, default_customer());
    }

    #[test]
    fn test_create_with_id_is_rejected_without_writing() {
        let customers = resource::<Customer>();
        let candidate = Customer {
            id: Some("preset".to_string()),
            ..default_customer()
        };

        let err = customers.create(candidate).unwrap_err();

        assert!(matches!(err, CrudError::Validation { key: "idexists", .. }));
        assert_eq!(count(&customers), 0);
    }

    #[test]
    fn test_create_with_missing_required_field_is_rejected() {
        let accounts = resource::<CheckingAccount>();

        let err = accounts
            .create(CheckingAccount {
                code: Some("0001".to_string()),
                ..Default::default()
            })
            .unwrap_err();

        match err {
            CrudError::Validation { key, errors, .. } => {
                assert_eq!(key, "validation");
                assert_eq!(errors[0].field, "balance");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(count(&accounts), 0);
    }

    #[test]
    fn test_update_without_id_creates() {
        let customers = resource::<Customer>();

        let saved = customers.update(default_customer()).unwrap();

        assert!(matches!(saved, Saved::Created { .. }));
        assert_eq!(count(&customers), 1);

        let err = customers
            .update(Customer {
                name: None,
                ..default_customer()
            })
            .unwrap_err();
        assert!(matches!(err, CrudError::Validation { key: "validation", .. }));
        assert_eq!(count(&customers), 1);
    }

    #[test]
    fn test_update_replaces_every_field() {
        let customers = resource::<Customer>();
        let created = customers.create(default_customer()).unwrap().into_entity();
        let id = created.id.clone().unwrap();

        let replacement = Customer {
            id: Some(id.clone()),
            name: Some("BBBBB".to_string()),
            tax_id: Some("BBBBB".to_string()),
            birth_date: None,
        };
        let saved = customers.update(replacement.clone()).unwrap();

        assert_eq!(saved, Saved::Updated(replacement.clone()));
        assert_eq!(customers.get(&id).unwrap(), Some(replacement));
        assert_eq!(count(&customers), 1);
    }

    #[test]
    fn test_update_requires_fields_when_id_present() {
        let customers = resource::<Customer>();
        let created = customers.create(default_customer()).unwrap().into_entity();

        let err = customers
            .update(Customer {
                tax_id: None,
                ..created.clone()
            })
            .unwrap_err();

        assert!(matches!(err, CrudError::Validation { .. }));
        assert_eq!(customers.get(created.id.as_deref().unwrap()).unwrap(), Some(created));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let transactions = resource::<Transaction>();
        let created = transactions
            .create(Transaction {
                amount: Some(99.9),
                kind: Some(TransactionKind::Debit),
                ..Default::default()
            })
            .unwrap()
            .into_entity();
        let id = created.id.unwrap();

        transactions.delete(&id).unwrap();
        assert_eq!(transactions.get(&id).unwrap(), None);
        assert_eq!(count(&transactions), 0);

        transactions.delete(&id).unwrap();
        assert_eq!(count(&transactions), 0);
    }

    #[test]
    fn test_update_with_empty_id_is_rejected_without_writing() {
        let customers = resource::<Customer>();

        let err = customers
            .update(Customer {
                id: Some(String::new()),
                ..default_customer()
            })
            .unwrap_err();

        match err {
            CrudError::Validation { key, errors, .. } => {
                assert_eq!(key, "idnull");
                assert_eq!(errors[0].field, "id");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(count(&customers), 0);
    }

    #[test]
    fn test_list_ignores_unknown_sort_field() {
        let customers = resource::<Customer>();
        let created = customers.create(default_customer()).unwrap().into_entity();
        let request = PageRequest::new(0, 20).with_order("balance", Direction::Asc);

        let page = customers.list(&request).unwrap();

        assert_eq!(page.content, vec![created]);
        assert_eq!(page.total_elements, 1);
    }

    #[test]
    fn test_list_reports_true_total() {
        let accounts = resource::<CheckingAccount>();
        for balance in [-5.0, 0.0, 12.5] {
            accounts
                .create(CheckingAccount {
                    balance: Some(balance),
                    ..Default::default()
                })
                .unwrap();
        }

        let page = accounts
            .list(&PageRequest::new(0, 2).with_order("id", Direction::Desc))
            .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 3);
    }
}
