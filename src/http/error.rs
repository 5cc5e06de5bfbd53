use super::headers::AlertHeaders;
use crate::error::CrudError;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

/// A `CrudError` rendered for the wire: status, failure alert headers, body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    headers: HeaderMap,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    field_errors: Vec<FieldErrorBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldErrorBody {
    object_name: String,
    field: String,
    message: String,
}

impl ApiError {
    pub fn from_crud(err: CrudError, alerts: &AlertHeaders) -> Self {
        let message = err.message_key();

        match &err {
            CrudError::Validation { entity, errors, .. } => {
                let entity = *entity;
                warn!(entity, error = %err, "Rejected request");
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    headers: alerts.failure(entity, &message),
                    body: ErrorBody {
                        description: err.to_string(),
                        field_errors: errors
                            .iter()
                            .map(|e| FieldErrorBody {
                                object_name: e.context.clone(),
                                field: e.field.clone(),
                                message: e.message.clone(),
                            })
                            .collect(),
                        message,
                    },
                }
            }
            CrudError::Store(_) => {
                error!(error = %err, "Store failure");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    headers: HeaderMap::new(),
                    body: ErrorBody {
                        message,
                        description: "Internal server error".to_string(),
                        field_errors: Vec::new(),
                    },
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.body)).into_response()
    }
}
