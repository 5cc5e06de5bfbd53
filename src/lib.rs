// Finance Records - Core Library
// Customers, checking accounts and transactions behind one CRUD protocol

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod gateway;
pub mod paging;
pub mod resource;
pub mod schema;
pub mod service;

#[cfg(feature = "server")]
pub mod http;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{open_database, setup_database, SharedConnection, SqliteGateway};
pub use entities::{CheckingAccount, Customer, Entity, Transaction, TransactionKind};
pub use error::{CrudError, CrudResult};
pub use gateway::Gateway;
pub use paging::{Direction, Order, Page, PageLimits, PageRequest};
pub use resource::{Resource, Saved};
pub use schema::{FieldSpec, SchemaValidator, ValidationError, ValidationResult};
pub use service::EntityService;

#[cfg(feature = "server")]
pub use http::{build_router, ApiSettings, AppState};
