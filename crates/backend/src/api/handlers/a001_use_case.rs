use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_use_case::{CurrentLevelRequest, UseCase, UseCaseFilter};
use contracts::usecases::common::OperationError;

use crate::domain::a001_use_case::service;
use crate::system::state::SharedState;

/// Код ответа для ошибки операции
pub fn status_for(error: &OperationError) -> StatusCode {
    match error.code.as_str() {
        "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
        "NOT_FOUND" => StatusCode::NOT_FOUND,
        "EXTERNAL_ERROR" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(error: OperationError) -> (StatusCode, Json<OperationError>) {
    tracing::warn!("A001: {}", error);
    (status_for(&error), Json(error))
}

/// GET /api/a001/use_case?production=yes|no&channels=Email,Web&development_time=S,M
pub async fn list_all(
    State(state): State<SharedState>,
    Query(filter): Query<UseCaseFilter>,
) -> Result<Json<Vec<UseCase>>, (StatusCode, Json<OperationError>)> {
    service::list_filtered(&state, &filter)
        .await
        .map(Json)
        .map_err(reject)
}

/// GET /api/a001/use_case/:id
pub async fn get_by_id(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<UseCase>, StatusCode> {
    match service::get_by_id(&state, &id).await {
        Some(use_case) => Ok(Json(use_case)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// POST /api/a001/use_case/:id/current_level
pub async fn set_current_level(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(request): Json<CurrentLevelRequest>,
) -> Result<Json<UseCase>, (StatusCode, Json<OperationError>)> {
    service::set_current_level(&state, &id, request.current_level)
        .await
        .map(Json)
        .map_err(reject)
}

/// POST /api/a001/use_case/:id/channel/:channel/cycle
pub async fn cycle_channel(
    State(state): State<SharedState>,
    Path((id, channel)): Path<(String, String)>,
) -> Result<Json<UseCase>, (StatusCode, Json<OperationError>)> {
    service::cycle_channel(&state, &id, &channel)
        .await
        .map(Json)
        .map_err(reject)
}
