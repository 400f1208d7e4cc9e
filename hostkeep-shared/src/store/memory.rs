//! In-memory entity store
//!
//! Each table is a `tokio::sync::RwLock<Vec<T>>` kept in insertion order, so
//! listings match the `created_at` ordering of the PostgreSQL store. Used by
//! tests and by `STORE_BACKEND=memory` for local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::booking::{Booking, CreateBooking};
use crate::models::customer::{CreateCustomer, Customer};
use crate::models::house::{CreateHouse, House};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User, UserCounter, UserCounters};
use crate::models::work::{CreateWork, Work};
use crate::models::BackRef;

/// Store keeping every table in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<Vec<Customer>>,
    houses: RwLock<Vec<House>>,
    bookings: RwLock<Vec<Booking>>,
    tasks: RwLock<Vec<Task>>,
    works: RwLock<Vec<Work>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Removes matching rows, returning them in table order
fn drain_where<T, F>(rows: &mut Vec<T>, mut pred: F) -> Vec<T>
where
    F: FnMut(&T) -> bool,
{
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows.drain(..) {
        if pred(&row) {
            removed.push(row);
        } else {
            kept.push(row);
        }
    }
    *rows = kept;
    removed
}

/// Replaces the row with the same id; `false` if absent
fn replace_row<T: Clone, F>(rows: &mut [T], row: &T, same_id: F) -> bool
where
    F: Fn(&T) -> bool,
{
    match rows.iter_mut().find(|r| same_id(r)) {
        Some(slot) => {
            *slot = row.clone();
            true
        }
        None => false,
    }
}

fn remove_row<T, F>(rows: &mut Vec<T>, same_id: F) -> bool
where
    F: Fn(&T) -> bool,
{
    let before = rows.len();
    rows.retain(|r| !same_id(r));
    rows.len() != before
}

impl MemoryStore {
    /// Runs `f` on the list identified by `list` on row `parent`
    async fn with_list<F>(&self, list: BackRef, parent: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut Vec<Uuid>),
    {
        match list {
            BackRef::CustomerHouses => {
                let mut customers = self.customers.write().await;
                match customers.iter_mut().find(|c| c.id == parent) {
                    Some(customer) => {
                        f(&mut customer.houses);
                        true
                    }
                    None => false,
                }
            }
            BackRef::HouseTasks | BackRef::HouseBookings => {
                let mut houses = self.houses.write().await;
                match houses.iter_mut().find(|h| h.id == parent) {
                    Some(house) => {
                        let ids = if list == BackRef::HouseTasks {
                            &mut house.tasks
                        } else {
                            &mut house.bookings
                        };
                        f(ids);
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_customer(&self, data: CreateCustomer) -> StoreResult<Customer> {
        let customer = Customer::new(data);
        self.customers.write().await.push(customer.clone());
        Ok(customer)
    }

    async fn find_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<bool> {
        let mut customers = self.customers.write().await;
        // houses is maintainer-owned; keep the stored list
        let stored = customers.iter().find(|c| c.id == customer.id).map(|c| c.houses.clone());
        let Some(houses) = stored else {
            return Ok(false);
        };
        let mut row = customer.clone();
        row.houses = houses;
        Ok(replace_row(&mut customers, &row, |c| c.id == customer.id))
    }

    async fn delete_customer(&self, id: Uuid) -> StoreResult<bool> {
        let mut customers = self.customers.write().await;
        Ok(remove_row(&mut customers, |c| c.id == id))
    }

    async fn create_house(&self, data: CreateHouse) -> StoreResult<House> {
        let house = House::new(data);
        self.houses.write().await.push(house.clone());
        Ok(house)
    }

    async fn find_house(&self, id: Uuid) -> StoreResult<Option<House>> {
        let houses = self.houses.read().await;
        Ok(houses.iter().find(|h| h.id == id).cloned())
    }

    async fn list_houses(&self) -> StoreResult<Vec<House>> {
        Ok(self.houses.read().await.clone())
    }

    async fn update_house(&self, house: &House) -> StoreResult<bool> {
        let mut houses = self.houses.write().await;
        let Some(slot) = houses.iter_mut().find(|h| h.id == house.id) else {
            return Ok(false);
        };
        slot.label = house.label.clone();
        slot.kind = house.kind.clone();
        slot.address = house.address.clone();
        slot.city = house.city.clone();
        slot.owner = house.owner;
        Ok(true)
    }

    async fn delete_house(&self, id: Uuid) -> StoreResult<bool> {
        let mut houses = self.houses.write().await;
        Ok(remove_row(&mut houses, |h| h.id == id))
    }

    async fn delete_houses_by_owner(&self, owner: Uuid) -> StoreResult<Vec<House>> {
        let mut houses = self.houses.write().await;
        Ok(drain_where(&mut houses, |h| h.owner == owner))
    }

    async fn create_booking(&self, data: CreateBooking) -> StoreResult<Booking> {
        let booking = Booking::new(data);
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }

    async fn update_booking(&self, booking: &Booking) -> StoreResult<bool> {
        let mut bookings = self.bookings.write().await;
        Ok(replace_row(&mut bookings, booking, |b| b.id == booking.id))
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<bool> {
        let mut bookings = self.bookings.write().await;
        Ok(remove_row(&mut bookings, |b| b.id == id))
    }

    async fn delete_bookings_by_house(&self, house: Uuid) -> StoreResult<Vec<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(drain_where(&mut bookings, |b| b.house == house))
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = Task::new(data);
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        Ok(replace_row(&mut tasks, task, |t| t.id == task.id))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        Ok(remove_row(&mut tasks, |t| t.id == id))
    }

    async fn delete_tasks_by_house(&self, house: Uuid) -> StoreResult<Vec<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(drain_where(&mut tasks, |t| t.house == house))
    }

    async fn delete_tasks_by_work(&self, work: Uuid) -> StoreResult<Vec<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(drain_where(&mut tasks, |t| t.work == work))
    }

    async fn create_work(&self, data: CreateWork) -> StoreResult<Work> {
        let work = Work::new(data);
        self.works.write().await.push(work.clone());
        Ok(work)
    }

    async fn find_work(&self, id: Uuid) -> StoreResult<Option<Work>> {
        let works = self.works.read().await;
        Ok(works.iter().find(|w| w.id == id).cloned())
    }

    async fn list_works(&self) -> StoreResult<Vec<Work>> {
        Ok(self.works.read().await.clone())
    }

    async fn update_work(&self, work: &Work) -> StoreResult<bool> {
        let mut works = self.works.write().await;
        Ok(replace_row(&mut works, work, |w| w.id == work.id))
    }

    async fn delete_work(&self, id: Uuid) -> StoreResult<bool> {
        let mut works = self.works.write().await;
        Ok(remove_row(&mut works, |w| w.id == id))
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = User::new(data);
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let username = username.to_lowercase();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn update_user(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.id != user.id && u.email == user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let Some(slot) = users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(false);
        };
        slot.first_name = user.first_name.clone();
        slot.last_name = user.last_name.clone();
        slot.email = user.email.clone();
        Ok(true)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(slot) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        slot.password_hash = password_hash.to_string();
        Ok(true)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        Ok(remove_row(&mut users, |u| u.id == id))
    }

    async fn adjust_counter(
        &self,
        user: Uuid,
        counter: UserCounter,
        delta: i32,
    ) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(slot) = users.iter_mut().find(|u| u.id == user) else {
            return Ok(false);
        };
        slot.counters.adjust(counter, delta);
        Ok(true)
    }

    async fn set_counters(&self, user: Uuid, counters: UserCounters) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(slot) = users.iter_mut().find(|u| u.id == user) else {
            return Ok(false);
        };
        slot.counters = counters;
        Ok(true)
    }

    async fn push_ref(&self, list: BackRef, parent: Uuid, child: Uuid) -> StoreResult<bool> {
        Ok(self.with_list(list, parent, |ids| ids.push(child)).await)
    }

    async fn pull_ref(&self, list: BackRef, parent: Uuid, child: Uuid) -> StoreResult<bool> {
        Ok(self
            .with_list(list, parent, |ids| ids.retain(|id| *id != child))
            .await)
    }

    async fn pull_ref_everywhere(&self, list: BackRef, child: Uuid) -> StoreResult<u64> {
        let mut touched = 0;
        match list {
            BackRef::CustomerHouses => {
                let mut customers = self.customers.write().await;
                for customer in customers.iter_mut().filter(|c| c.houses.contains(&child)) {
                    customer.houses.retain(|id| *id != child);
                    touched += 1;
                }
            }
            BackRef::HouseTasks => {
                let mut houses = self.houses.write().await;
                for house in houses.iter_mut().filter(|h| h.tasks.contains(&child)) {
                    house.tasks.retain(|id| *id != child);
                    touched += 1;
                }
            }
            BackRef::HouseBookings => {
                let mut houses = self.houses.write().await;
                for house in houses.iter_mut().filter(|h| h.bookings.contains(&child)) {
                    house.bookings.retain(|id| *id != child);
                    touched += 1;
                }
            }
        }
        Ok(touched)
    }

    async fn replace_refs(
        &self,
        list: BackRef,
        parent: Uuid,
        children: &[Uuid],
    ) -> StoreResult<bool> {
        Ok(self
            .with_list(list, parent, |ids| *ids = children.to_vec())
            .await)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
