//! Work operations

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::integrity::{cascade, ConsistencyReport};
use crate::models::work::{CreateWork, UpdateWork, Work};
use crate::models::EntityKind;
use crate::store::EntityStore;

pub async fn add(store: &dyn EntityStore, data: CreateWork) -> ServiceResult<Work> {
    data.validate()?;

    let work = store.create_work(data).await?;
    info!(work_id = %work.id, name = %work.name, "Work created");
    Ok(work)
}

pub async fn list(store: &dyn EntityStore) -> ServiceResult<Vec<Work>> {
    Ok(store.list_works().await?)
}

pub async fn get(store: &dyn EntityStore, id: Uuid) -> ServiceResult<Work> {
    store
        .find_work(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Work, id))
}

pub async fn update(store: &dyn EntityStore, id: Uuid, update: UpdateWork) -> ServiceResult<Work> {
    update.validate()?;

    let mut work = get(store, id).await?;
    work.apply(update);
    if !store.update_work(&work).await? {
        return Err(ServiceError::not_found(EntityKind::Work, id));
    }

    Ok(work)
}

/// Deletes a work and every task instantiating it
pub async fn remove(store: &dyn EntityStore, id: Uuid) -> ServiceResult<ConsistencyReport> {
    if !store.delete_work(id).await? {
        return Err(ServiceError::not_found(EntityKind::Work, id));
    }

    let mut report = ConsistencyReport::new();
    cascade::work_removed(store, id, &mut report).await;

    info!(work_id = %id, tasks_removed = report.removed.tasks, "Work deleted");
    Ok(report)
}
