//! House operations

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::integrity::{associations, cascade, ConsistencyReport, Outcome};
use crate::models::house::{CreateHouse, House, UpdateHouse};
use crate::models::{BackRef, EntityKind};
use crate::populate::{self, HouseDetail, HouseSummary};
use crate::store::EntityStore;

/// Creates a house and links it into its owner's `houses`
///
/// A missing owner does not fail the create; it is reported.
pub async fn add(store: &dyn EntityStore, data: CreateHouse) -> ServiceResult<Outcome<House>> {
    data.validate()?;

    let house = store.create_house(data).await?;
    let mut report = ConsistencyReport::new();
    associations::link(store, BackRef::CustomerHouses, house.owner, house.id, &mut report).await;

    info!(house_id = %house.id, owner = %house.owner, "House created");
    Ok(Outcome::new(house, report))
}

/// All houses, owner inlined
pub async fn list(store: &dyn EntityStore) -> ServiceResult<Vec<HouseSummary>> {
    Ok(populate::houses(store).await?)
}

/// One house with owner, tasks and bookings inlined
pub async fn get(store: &dyn EntityStore, id: Uuid) -> ServiceResult<HouseDetail> {
    populate::house(store, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::House, id))
}

/// Applies a partial update; a new `owner` re-parents the house
pub async fn update(
    store: &dyn EntityStore,
    id: Uuid,
    update: UpdateHouse,
) -> ServiceResult<Outcome<House>> {
    update.validate()?;

    let mut house = store
        .find_house(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::House, id))?;
    let previous_owner = house.owner;

    house.apply(update);
    if !store.update_house(&house).await? {
        return Err(ServiceError::not_found(EntityKind::House, id));
    }

    let mut report = ConsistencyReport::new();
    associations::relink(
        store,
        BackRef::CustomerHouses,
        previous_owner,
        house.owner,
        house.id,
        &mut report,
    )
    .await;

    Ok(Outcome::new(house, report))
}

/// Deletes a house with its tasks and bookings
pub async fn remove(store: &dyn EntityStore, id: Uuid) -> ServiceResult<ConsistencyReport> {
    let house = store
        .find_house(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::House, id))?;

    if !store.delete_house(id).await? {
        return Err(ServiceError::not_found(EntityKind::House, id));
    }

    let mut report = ConsistencyReport::new();
    cascade::house_removed(store, &house, &mut report).await;

    info!(
        house_id = %id,
        tasks_removed = report.removed.tasks,
        bookings_removed = report.removed.bookings,
        issues = report.issues.len(),
        "House deleted"
    );
    Ok(report)
}
