// Entity Models - Customer, CheckingAccount, Transaction
// Each record type declares its store collection, REST resource and field
// shape; the gateway, service and CRUD protocol are generic over `Entity`.

pub mod checking_account;
pub mod customer;
pub mod transaction;

pub use checking_account::CheckingAccount;
pub use customer::Customer;
pub use transaction::{Transaction, TransactionKind};

use crate::schema::FieldSpec;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A persisted record type.
///
/// Identity is an opaque store-assigned string: `None` until the first save,
/// never changed afterwards.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Name used in alerts, logs and validation errors (e.g. "customer")
    const NAME: &'static str;

    /// Document store collection
    const COLLECTION: &'static str;

    /// Path segment under `/api` (e.g. "customers")
    const RESOURCE: &'static str;

    /// Declared fields, excluding `id`
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);
}
