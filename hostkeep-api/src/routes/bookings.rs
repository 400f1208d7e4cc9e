/// Booking endpoints
///
/// - `POST /bookings` - Create a booking and link it to its house
/// - `GET /bookings`, `GET /bookings/:id` - Bookings with house inlined
/// - `PUT /bookings/:id` - Update; moves check-in/check-out counters
/// - `DELETE /bookings/:id` - Delete and unlink
///
/// A completed check-in or check-out with no performer named credits the
/// caller.

use super::{created_with_report, Created, Payload, RecordId};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use hostkeep_shared::auth::middleware::AuthContext;
use hostkeep_shared::models::booking::{Booking, CreateBooking, UpdateBooking};
use hostkeep_shared::populate::BookingView;
use hostkeep_shared::services::bookings;

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(req): Payload<CreateBooking>,
) -> ApiResult<Json<Created<Booking>>> {
    let outcome = bookings::add(state.store(), req, auth.user_id).await?;
    Ok(created_with_report(outcome))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<BookingView>>> {
    Ok(Json(bookings::list(state.store()).await?))
}

pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<Json<BookingView>> {
    Ok(Json(bookings::get(state.store(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    RecordId(id): RecordId,
    Payload(req): Payload<UpdateBooking>,
) -> ApiResult<StatusCode> {
    bookings::update(state.store(), id, req, auth.user_id).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<StatusCode> {
    bookings::remove(state.store(), id).await?;
    Ok(StatusCode::OK)
}
