/// Customer endpoints
///
/// - `POST /customers` - Create a customer
/// - `GET /customers` - List customers
/// - `GET /customers/:id` - Customer with houses inlined (tasks as `{id, cost}`)
/// - `PUT /customers/:id` - Update names
/// - `DELETE /customers/:id` - Delete with its houses, their tasks and bookings

use super::{created, Created, Payload, RecordId};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use hostkeep_shared::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use hostkeep_shared::populate::CustomerDetail;
use hostkeep_shared::services::customers;

pub async fn create(
    State(state): State<AppState>,
    Payload(req): Payload<CreateCustomer>,
) -> ApiResult<Json<Created<Customer>>> {
    let customer = customers::add(state.store(), req).await?;
    Ok(created(customer))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(customers::list(state.store()).await?))
}

pub async fn get(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<CustomerDetail>> {
    Ok(Json(customers::get(state.store(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Payload(req): Payload<UpdateCustomer>,
) -> ApiResult<StatusCode> {
    customers::update(state.store(), id, req).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<StatusCode> {
    customers::remove(state.store(), id).await?;
    Ok(StatusCode::OK)
}
