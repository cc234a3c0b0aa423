use axum::body::Bytes;
use axum::response::IntoResponse;
use axum::{
    Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::containers::models::operation::{
    BulkOperationRequest, Operation, OperationError, OperationParams,
};
use crate::domain::containers::models::outcome::OperationOutcome;
use crate::domain::containers::models::record::{ContainerId, GenericRecord};
use crate::domain::containers::ports::ContainerOperationsService;
use crate::domain::containers::validation::Rejection;
use crate::domain::system::info::SystemInfoSummary;

#[derive(Clone)]
pub struct AppState<CS: ContainerOperationsService> {
    pub container_service: Arc<CS>,
    pub api_secret: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

fn status_for(error: &OperationError) -> StatusCode {
    match error {
        OperationError::UnknownOperation(_) | OperationError::BadRequest(_) => {
            StatusCode::BAD_REQUEST
        }
        OperationError::NotFound(_)
        | OperationError::ValidationFailed {
            reason: Rejection::NotFound,
            ..
        } => StatusCode::NOT_FOUND,
        OperationError::ValidationFailed { .. } => StatusCode::CONFLICT,
        OperationError::BackendFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn rejected<T>(error: OperationError) -> (StatusCode, Json<ApiResponse<T>>) {
    (status_for(&error), Json(ApiResponse::failure(error)))
}

// Authentication middleware
async fn auth_middleware<CS: ContainerOperationsService>(
    State(state): State<AppState<CS>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let api_secret = match state.api_secret {
        Some(secret) => secret,
        None => return Ok(next.run(request).await),
    };
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    };
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    match token {
        Some(token) if token == api_secret => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

// Web handlers
async fn health() -> &'static str {
    "OK"
}

async fn get_containers<CS: ContainerOperationsService>(
    State(state): State<AppState<CS>>,
) -> ApiResult<Vec<GenericRecord>> {
    match state.container_service.list_containers().await {
        Ok(containers) => Ok(Json(ApiResponse::success(containers))),
        Err(e) => {
            error!("Error listing containers: {e}");
            Err(rejected(e))
        }
    }
}

async fn get_container<CS: ContainerOperationsService>(
    State(state): State<AppState<CS>>,
    Path(id): Path<ContainerId>,
) -> ApiResult<GenericRecord> {
    debug!("get container {id}");
    match state.container_service.get_container(&id).await {
        Ok(container) => Ok(Json(ApiResponse::success(container))),
        Err(e) => {
            error!("Error getting container {id}: {e}");
            Err(rejected(e))
        }
    }
}

async fn post_container_operation<CS: ContainerOperationsService>(
    State(state): State<AppState<CS>>,
    Path((id, operation)): Path<(ContainerId, String)>,
    body: Bytes,
) -> Response {
    debug!("{operation} requested for container {id}");
    let operation = match operation.parse::<Operation>() {
        Ok(operation) => operation,
        Err(e) => return rejected::<()>(e).into_response(),
    };
    let params = match OperationParams::from_body(&body) {
        Ok(params) => params,
        Err(e) => return rejected::<()>(e).into_response(),
    };

    let result = state
        .container_service
        .execute(&id, operation, &params)
        .await;
    let status = match &result {
        Ok(()) => StatusCode::OK,
        Err(e) => status_for(e),
    };
    (
        status,
        Json(OperationOutcome::from_result(&id, operation, &result)),
    )
        .into_response()
}

async fn post_bulk_operation<CS: ContainerOperationsService>(
    State(state): State<AppState<CS>>,
    Path(operation): Path<String>,
    body: Bytes,
) -> Response {
    debug!("bulk {operation} requested");
    let operation = match operation.parse::<Operation>() {
        Ok(operation) => operation,
        Err(e) => return rejected::<()>(e).into_response(),
    };
    let request = match BulkOperationRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => return rejected::<()>(e).into_response(),
    };

    let outcomes = state
        .container_service
        .execute_bulk(&request.container_ids, operation, request.force)
        .await;
    Json(outcomes).into_response()
}

async fn get_system_info<CS: ContainerOperationsService>(
    State(state): State<AppState<CS>>,
) -> ApiResult<SystemInfoSummary> {
    match state.container_service.system_info().await {
        Ok(summary) => Ok(Json(ApiResponse::success(summary))),
        Err(e) => {
            error!("Error getting system info: {e}");
            Err(rejected(e))
        }
    }
}

pub async fn create_app<CS: ContainerOperationsService>(state: AppState<CS>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/containers", get(get_containers))
        .route("/api/v1/containers/{id}", get(get_container))
        .route(
            "/api/v1/containers/bulk/{operation}",
            post(post_bulk_operation),
        )
        .route(
            "/api/v1/containers/{id}/{operation}",
            post(post_container_operation),
        )
        .route("/api/v1/system/info", get(get_system_info))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
