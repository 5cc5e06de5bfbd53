// HTTP surface - one CRUD resource per entity under /api

pub mod error;
pub mod handlers;
pub mod headers;

use crate::db::{SharedConnection, SqliteGateway};
use crate::entities::{CheckingAccount, Customer, Entity, Transaction};
use crate::paging::PageLimits;
use crate::resource::Resource;
use crate::service::EntityService;
use anyhow::Result;
use axum::{routing::get, Router};
use self::headers::AlertHeaders;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Settings shared by every resource
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub alerts: AlertHeaders,
    pub limits: PageLimits,
}

impl ApiSettings {
    pub fn new(app_name: &str, limits: PageLimits) -> Result<Self> {
        Ok(ApiSettings {
            alerts: AlertHeaders::new(app_name)?,
            limits,
        })
    }
}

/// Router state of one resource
pub struct ResourceState<E: Entity> {
    pub resource: Resource<E>,
    pub settings: Arc<ApiSettings>,
}

impl<E: Entity> Clone for ResourceState<E> {
    fn clone(&self) -> Self {
        ResourceState {
            resource: self.resource.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// The three resources, each wired gateway -> service -> protocol
#[derive(Clone)]
pub struct AppState {
    pub customers: Resource<Customer>,
    pub checking_accounts: Resource<CheckingAccount>,
    pub transactions: Resource<Transaction>,
    pub settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(conn: SharedConnection, settings: ApiSettings) -> Self {
        AppState {
            customers: wire(&conn),
            checking_accounts: wire(&conn),
            transactions: wire(&conn),
            settings: Arc::new(settings),
        }
    }
}

fn wire<E: Entity>(conn: &SharedConnection) -> Resource<E> {
    let gateway = Arc::new(SqliteGateway::<E>::new(Arc::clone(conn)));
    Resource::new(EntityService::new(gateway))
}

pub fn build_router(state: AppState) -> Router {
    let settings = state.settings;

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .merge(resource_routes(state.customers, &settings))
        .merge(resource_routes(state.checking_accounts, &settings))
        .merge(resource_routes(state.transactions, &settings))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// POST/PUT/GET on the collection, GET/DELETE on `/:id`
fn resource_routes<E: Entity>(resource: Resource<E>, settings: &Arc<ApiSettings>) -> Router {
    let collection = resource.base_path().to_string();
    let item = format!("{}/:id", collection);

    Router::new()
        .route(
            &collection,
            get(handlers::list::<E>)
                .post(handlers::create::<E>)
                .put(handlers::update::<E>),
        )
        .route(
            &item,
            get(handlers::get_one::<E>).delete(handlers::delete::<E>),
        )
        .with_state(ResourceState {
            resource,
            settings: Arc::clone(settings),
        })
}
