/// House endpoints
///
/// - `POST /houses` - Create a house and link it to its owner
/// - `GET /houses` - List houses, owner inlined
/// - `GET /houses/:id` - House with owner, tasks and bookings inlined
/// - `PUT /houses/:id` - Update; a new `owner` re-parents the house
/// - `DELETE /houses/:id` - Delete with its tasks and bookings

use super::{created_with_report, Created, Payload, RecordId};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use hostkeep_shared::models::house::{CreateHouse, House, UpdateHouse};
use hostkeep_shared::populate::{HouseDetail, HouseSummary};
use hostkeep_shared::services::houses;

pub async fn create(
    State(state): State<AppState>,
    Payload(req): Payload<CreateHouse>,
) -> ApiResult<Json<Created<House>>> {
    let outcome = houses::add(state.store(), req).await?;
    Ok(created_with_report(outcome))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<HouseSummary>>> {
    Ok(Json(houses::list(state.store()).await?))
}

pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<Json<HouseDetail>> {
    Ok(Json(houses::get(state.store(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Payload(req): Payload<UpdateHouse>,
) -> ApiResult<StatusCode> {
    houses::update(state.store(), id, req).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<StatusCode> {
    houses::remove(state.store(), id).await?;
    Ok(StatusCode::OK)
}
