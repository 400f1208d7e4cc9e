//! Booking operations

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::integrity::{associations, counters, ConsistencyReport, Outcome};
use crate::models::booking::{Booking, CreateBooking, UpdateBooking};
use crate::models::{BackRef, EntityKind};
use crate::populate::{self, BookingView};
use crate::store::EntityStore;

const INVALID_STAY: &str = "checkOutDate must not be before checkInDate";

/// Fills an unnamed check-in/check-out performer with the acting user
fn credit_actor(booking: &mut Booking, actor: Uuid) {
    if booking.check_in_completed && booking.check_in_by.is_none() {
        booking.check_in_by = Some(actor);
    }
    if booking.check_out_completed && booking.check_out_by.is_none() {
        booking.check_out_by = Some(actor);
    }
}

/// Creates a booking, links it into its house and credits completed steps
pub async fn add(
    store: &dyn EntityStore,
    mut data: CreateBooking,
    actor: Uuid,
) -> ServiceResult<Outcome<Booking>> {
    data.validate()?;
    if data.check_out_date < data.check_in_date {
        return Err(ServiceError::validation(INVALID_STAY));
    }
    if data.check_in_completed && data.check_in_by.is_none() {
        data.check_in_by = Some(actor);
    }
    if data.check_out_completed && data.check_out_by.is_none() {
        data.check_out_by = Some(actor);
    }

    let booking = store.create_booking(data).await?;
    let mut report = ConsistencyReport::new();
    associations::link(store, BackRef::HouseBookings, booking.house, booking.id, &mut report).await;
    counters::booking_changed(store, None, Some(&booking), &mut report).await;

    info!(booking_id = %booking.id, house = %booking.house, "Booking created");
    Ok(Outcome::new(booking, report))
}

/// All bookings, house inlined
pub async fn list(store: &dyn EntityStore) -> ServiceResult<Vec<BookingView>> {
    Ok(populate::bookings(store).await?)
}

pub async fn get(store: &dyn EntityStore, id: Uuid) -> ServiceResult<BookingView> {
    populate::booking(store, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Booking, id))
}

/// Applies a partial update: re-parents on a new `house`, moves the
/// check-in/check-out counters on completion changes
pub async fn update(
    store: &dyn EntityStore,
    id: Uuid,
    update: UpdateBooking,
    actor: Uuid,
) -> ServiceResult<Outcome<Booking>> {
    update.validate()?;

    let previous = store
        .find_booking(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Booking, id))?;

    let mut booking = previous.clone();
    booking.apply(update);
    credit_actor(&mut booking, actor);
    if !booking.has_valid_stay() {
        return Err(ServiceError::validation(INVALID_STAY));
    }

    if !store.update_booking(&booking).await? {
        return Err(ServiceError::not_found(EntityKind::Booking, id));
    }

    let mut report = ConsistencyReport::new();
    associations::relink(
        store,
        BackRef::HouseBookings,
        previous.house,
        booking.house,
        booking.id,
        &mut report,
    )
    .await;
    counters::booking_changed(store, Some(&previous), Some(&booking), &mut report).await;

    Ok(Outcome::new(booking, report))
}

pub async fn remove(store: &dyn EntityStore, id: Uuid) -> ServiceResult<ConsistencyReport> {
    let booking = store
        .find_booking(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Booking, id))?;

    if !store.delete_booking(id).await? {
        return Err(ServiceError::not_found(EntityKind::Booking, id));
    }

    let mut report = ConsistencyReport::new();
    associations::unlink(store, BackRef::HouseBookings, id, &mut report).await;
    counters::booking_changed(store, Some(&booking), None, &mut report).await;

    info!(booking_id = %id, "Booking deleted");
    Ok(report)
}
