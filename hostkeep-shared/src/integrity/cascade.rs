//! Cascading deletes
//!
//! Run after the parent row is gone. Every dependant that is removed also
//! goes through the counter and back-reference maintenance it would get if
//! it were deleted on its own.

use tracing::info;
use uuid::Uuid;

use super::associations;
use super::counters;
use super::report::{ConsistencyReport, MaintenanceStep};
use crate::models::house::House;
use crate::models::BackRef;
use crate::store::EntityStore;

/// Removes the houses of a deleted customer, and everything below them
pub async fn customer_removed(
    store: &dyn EntityStore,
    customer: Uuid,
    report: &mut ConsistencyReport,
) {
    let houses = match store.delete_houses_by_owner(customer).await {
        Ok(houses) => houses,
        Err(e) => {
            report.record(
                MaintenanceStep::Cascade,
                format!("houses?owner={}", customer),
                e.to_string(),
            );
            return;
        }
    };

    report.removed.houses += houses.len();
    for house in &houses {
        house_removed(store, house, report).await;
    }

    info!(
        customer_id = %customer,
        houses = houses.len(),
        "Customer cascade finished"
    );
}

/// Removes the tasks and bookings of a deleted house and unlinks it from
/// its customer
pub async fn house_removed(store: &dyn EntityStore, house: &House, report: &mut ConsistencyReport) {
    match store.delete_tasks_by_house(house.id).await {
        Ok(tasks) => {
            report.removed.tasks += tasks.len();
            for task in &tasks {
                counters::task_changed(store, Some(task), None, report).await;
            }
        }
        Err(e) => report.record(
            MaintenanceStep::Cascade,
            format!("tasks?house={}", house.id),
            e.to_string(),
        ),
    }

    match store.delete_bookings_by_house(house.id).await {
        Ok(bookings) => {
            report.removed.bookings += bookings.len();
            for booking in &bookings {
                counters::booking_changed(store, Some(booking), None, report).await;
            }
        }
        Err(e) => report.record(
            MaintenanceStep::Cascade,
            format!("bookings?house={}", house.id),
            e.to_string(),
        ),
    }

    associations::unlink(store, BackRef::CustomerHouses, house.id, report).await;
}

/// Removes the tasks of a deleted work and unlinks them from their houses
pub async fn work_removed(store: &dyn EntityStore, work: Uuid, report: &mut ConsistencyReport) {
    let tasks = match store.delete_tasks_by_work(work).await {
        Ok(tasks) => tasks,
        Err(e) => {
            report.record(
                MaintenanceStep::Cascade,
                format!("tasks?work={}", work),
                e.to_string(),
            );
            return;
        }
    };

    report.removed.tasks += tasks.len();
    for task in &tasks {
        if let Err(e) = store.pull_ref(BackRef::HouseTasks, task.house, task.id).await {
            report.record(
                MaintenanceStep::Unlink,
                format!("{}/{}", BackRef::HouseTasks, task.house),
                e.to_string(),
            );
        }
        counters::task_changed(store, Some(task), None, report).await;
    }

    info!(work_id = %work, tasks = tasks.len(), "Work cascade finished");
}
