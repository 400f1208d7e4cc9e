//! Rebuilds derived data from the children's foreign keys
//!
//! Back-reference lists and user counters are caches. [`reconcile`] reads
//! every table, recomputes what the caches should hold and writes back only
//! the rows that differ. A list counts as correct when it holds the same ids
//! as expected in any order; repaired lists are written in `created_at`
//! order.

use serde::Serialize;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::models::user::{UserCounter, UserCounters};
use crate::models::BackRef;
use crate::store::{EntityStore, StoreResult};

/// Rows rewritten by a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub customers_repaired: usize,
    pub houses_repaired: usize,
    pub users_repaired: usize,
}

impl ReconcileReport {
    pub fn total(&self) -> usize {
        self.customers_repaired + self.houses_repaired + self.users_repaired
    }
}

fn same_members(stored: &[Uuid], expected: &[Uuid]) -> bool {
    let mut stored = stored.to_vec();
    let mut expected = expected.to_vec();
    stored.sort_unstable();
    expected.sort_unstable();
    stored == expected
}

/// Recomputes every back-reference list and user counter
///
/// # Errors
///
/// Stops at the first store failure; rows already repaired stay repaired.
pub async fn reconcile(store: &dyn EntityStore) -> StoreResult<ReconcileReport> {
    let customers = store.list_customers().await?;
    let houses = store.list_houses().await?;
    let tasks = store.list_tasks().await?;
    let bookings = store.list_bookings().await?;
    let users = store.list_users().await?;

    let mut report = ReconcileReport::default();

    let mut houses_by_owner: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for house in &houses {
        houses_by_owner.entry(house.owner).or_default().push(house.id);
    }

    for customer in &customers {
        let expected = houses_by_owner.remove(&customer.id).unwrap_or_default();
        if !same_members(&customer.houses, &expected) {
            store
                .replace_refs(BackRef::CustomerHouses, customer.id, &expected)
                .await?;
            report.customers_repaired += 1;
        }
    }

    let mut tasks_by_house: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut counters: HashMap<Uuid, UserCounters> = HashMap::new();
    for task in &tasks {
        tasks_by_house.entry(task.house).or_default().push(task.id);
        if let (true, Some(user)) = (task.completed, task.completed_by) {
            counters.entry(user).or_default().adjust(UserCounter::Tasks, 1);
        }
    }

    let mut bookings_by_house: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for booking in &bookings {
        bookings_by_house
            .entry(booking.house)
            .or_default()
            .push(booking.id);
        if let (true, Some(user)) = (booking.check_in_completed, booking.check_in_by) {
            counters.entry(user).or_default().adjust(UserCounter::CheckIns, 1);
        }
        if let (true, Some(user)) = (booking.check_out_completed, booking.check_out_by) {
            counters.entry(user).or_default().adjust(UserCounter::CheckOuts, 1);
        }
    }

    for house in &houses {
        let expected_tasks = tasks_by_house.remove(&house.id).unwrap_or_default();
        let expected_bookings = bookings_by_house.remove(&house.id).unwrap_or_default();
        let mut repaired = false;

        if !same_members(&house.tasks, &expected_tasks) {
            store
                .replace_refs(BackRef::HouseTasks, house.id, &expected_tasks)
                .await?;
            repaired = true;
        }
        if !same_members(&house.bookings, &expected_bookings) {
            store
                .replace_refs(BackRef::HouseBookings, house.id, &expected_bookings)
                .await?;
            repaired = true;
        }
        if repaired {
            report.houses_repaired += 1;
        }
    }

    for user in &users {
        let expected = counters.remove(&user.id).unwrap_or_default();
        if user.counters != expected {
            store.set_counters(user.id, expected).await?;
            report.users_repaired += 1;
        }
    }

    info!(
        customers_repaired = report.customers_repaired,
        houses_repaired = report.houses_repaired,
        users_repaired = report.users_repaired,
        "Reconciliation finished"
    );

    Ok(report)
}
