/// Work endpoints
///
/// Deleting a work deletes every task that instantiates it.

use super::{created, Created, Payload, RecordId};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use hostkeep_shared::models::work::{CreateWork, UpdateWork, Work};
use hostkeep_shared::services::works;

pub async fn create(
    State(state): State<AppState>,
    Payload(req): Payload<CreateWork>,
) -> ApiResult<Json<Created<Work>>> {
    Ok(created(works::add(state.store(), req).await?))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Work>>> {
    Ok(Json(works::list(state.store()).await?))
}

pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<Json<Work>> {
    Ok(Json(works::get(state.store(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Payload(req): Payload<UpdateWork>,
) -> ApiResult<StatusCode> {
    works::update(state.store(), id, req).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<StatusCode> {
    works::remove(state.store(), id).await?;
    Ok(StatusCode::OK)
}
