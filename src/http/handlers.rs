// REST handlers, generic over the entity type.
// Each one reads the request, runs the CRUD protocol and maps the outcome to
// a status, headers and body.

use super::error::{ApiError, ApiResult};
use super::headers::pagination_headers;
use super::ResourceState;
use crate::entities::Entity;
use crate::error::CrudError;
use crate::paging::PageRequest;
use crate::resource::Saved;
use crate::schema::ValidationError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}

/// POST /api/{resource} - 201 with Location, or 400
pub async fn create<E: Entity>(
    State(state): State<ResourceState<E>>,
    payload: Result<Json<E>, JsonRejection>,
) -> ApiResult<Response> {
    let candidate = read_body(&state, payload)?;
    let saved = state.resource.create(candidate).map_err(|e| state.fail(e))?;
    Ok(saved_response(&state, saved))
}

/// PUT /api/{resource} - 200, 201 when the record had no id, or 400
pub async fn update<E: Entity>(
    State(state): State<ResourceState<E>>,
    payload: Result<Json<E>, JsonRejection>,
) -> ApiResult<Response> {
    let candidate = read_body(&state, payload)?;
    let saved = state.resource.update(candidate).map_err(|e| state.fail(e))?;
    Ok(saved_response(&state, saved))
}

/// GET /api/{resource}?page=&size=&sort= - page content in the body,
/// pagination in the headers
pub async fn list<E: Entity>(
    State(state): State<ResourceState<E>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let request = PageRequest::from_query(&pairs, state.settings.limits);
    let page = state.resource.list(&request).map_err(|e| state.fail(e))?;

    let headers = pagination_headers(&page, state.resource.base_path());
    Ok((StatusCode::OK, headers, Json(page.content)).into_response())
}

/// GET /api/{resource}/:id - 200, or 404 with an empty body
pub async fn get_one<E: Entity>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let found = state.resource.get(&id).map_err(|e| state.fail(e))?;

    Ok(match found {
        Some(entity) => (StatusCode::OK, Json(entity)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// DELETE /api/{resource}/:id - always 200, empty body
pub async fn delete<E: Entity>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    state.resource.delete(&id).map_err(|e| state.fail(e))?;

    let headers = state.settings.alerts.entity_deleted(E::NAME, &id);
    Ok((StatusCode::OK, headers).into_response())
}

/// Undecodable bodies (bad JSON, wrong field types, unknown `kind`) are
/// validation failures like any other
fn read_body<E: Entity>(
    state: &ResourceState<E>,
    payload: Result<Json<E>, JsonRejection>,
) -> ApiResult<E> {
    payload.map(|Json(entity)| entity).map_err(|rejection| {
        state.fail(CrudError::validation(
            E::NAME,
            "validation",
            vec![ValidationError::new(E::NAME, "*", rejection.body_text())],
        ))
    })
}

fn saved_response<E: Entity>(state: &ResourceState<E>, saved: Saved<E>) -> Response {
    let alerts = &state.settings.alerts;
    let id = saved.entity().id().unwrap_or_default().to_string();

    match saved {
        Saved::Created { entity, location } => {
            let mut headers: HeaderMap = alerts.entity_created(E::NAME, &id);
            if let Ok(value) = HeaderValue::from_str(&location) {
                headers.insert(LOCATION, value);
            }
            (StatusCode::CREATED, headers, Json(entity)).into_response()
        }
        Saved::Updated(entity) => {
            let headers = alerts.entity_updated(E::NAME, &id);
            (StatusCode::OK, headers, Json(entity)).into_response()
        }
    }
}

impl<E: Entity> ResourceState<E> {
    fn fail(&self, err: CrudError) -> ApiError {
        ApiError::from_crud(err, &self.settings.alerts)
    }
}
