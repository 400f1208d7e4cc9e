//! Task operations
//!
//! Completing a task credits `completedBy`. When the payload completes a task
//! without naming anyone, the acting user is credited.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::integrity::{associations, counters, ConsistencyReport, Outcome};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::{BackRef, EntityKind};
use crate::populate::{self, TaskView};
use crate::store::EntityStore;

/// Creates a task, links it into its house and credits a completed task
pub async fn add(
    store: &dyn EntityStore,
    mut data: CreateTask,
    actor: Uuid,
) -> ServiceResult<Outcome<Task>> {
    data.validate()?;
    if data.completed && data.completed_by.is_none() {
        data.completed_by = Some(actor);
    }

    let task = store.create_task(data).await?;
    let mut report = ConsistencyReport::new();
    associations::link(store, BackRef::HouseTasks, task.house, task.id, &mut report).await;
    counters::task_changed(store, None, Some(&task), &mut report).await;

    info!(task_id = %task.id, house = %task.house, work = %task.work, "Task created");
    Ok(Outcome::new(task, report))
}

/// All tasks, house and work inlined
pub async fn list(store: &dyn EntityStore) -> ServiceResult<Vec<TaskView>> {
    Ok(populate::tasks(store).await?)
}

pub async fn get(store: &dyn EntityStore, id: Uuid) -> ServiceResult<TaskView> {
    populate::task(store, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))
}

/// Applies a partial update
///
/// The task row is written first, then the house lists are relinked, then
/// the completion counters move.
pub async fn update(
    store: &dyn EntityStore,
    id: Uuid,
    update: UpdateTask,
    actor: Uuid,
) -> ServiceResult<Outcome<Task>> {
    update.validate()?;

    let previous = store
        .find_task(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))?;

    let mut task = previous.clone();
    task.apply(update);
    if task.completed && task.completed_by.is_none() {
        task.completed_by = Some(actor);
    }

    if !store.update_task(&task).await? {
        return Err(ServiceError::not_found(EntityKind::Task, id));
    }

    let mut report = ConsistencyReport::new();
    associations::relink(
        store,
        BackRef::HouseTasks,
        previous.house,
        task.house,
        task.id,
        &mut report,
    )
    .await;
    counters::task_changed(store, Some(&previous), Some(&task), &mut report).await;

    Ok(Outcome::new(task, report))
}

pub async fn remove(store: &dyn EntityStore, id: Uuid) -> ServiceResult<ConsistencyReport> {
    let task = store
        .find_task(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))?;

    if !store.delete_task(id).await? {
        return Err(ServiceError::not_found(EntityKind::Task, id));
    }

    let mut report = ConsistencyReport::new();
    associations::unlink(store, BackRef::HouseTasks, id, &mut report).await;
    counters::task_changed(store, Some(&task), None, &mut report).await;

    info!(task_id = %id, "Task deleted");
    Ok(report)
}
