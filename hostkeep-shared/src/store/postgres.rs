//! PostgreSQL entity store
//!
//! Thin adapter from [`EntityStore`] onto the model-level queries in
//! `crate::models`. Back-reference pushes/pulls and counter adjustments are
//! single `UPDATE` statements.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EntityStore, StoreError, StoreResult};
use crate::db::pool;
use crate::models::backref;
use crate::models::booking::{Booking, CreateBooking};
use crate::models::customer::{CreateCustomer, Customer};
use crate::models::house::{CreateHouse, House};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User, UserCounter, UserCounters};
use crate::models::work::{CreateWork, Work};
use crate::models::BackRef;

/// Store backed by a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn create_customer(&self, data: CreateCustomer) -> StoreResult<Customer> {
        Ok(Customer::create(&self.pool, data).await?)
    }

    async fn find_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        Ok(Customer::find_by_id(&self.pool, id).await?)
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(Customer::list(&self.pool).await?)
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<bool> {
        Ok(Customer::save(&self.pool, customer).await?)
    }

    async fn delete_customer(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Customer::delete(&self.pool, id).await?)
    }

    async fn create_house(&self, data: CreateHouse) -> StoreResult<House> {
        Ok(House::create(&self.pool, data).await?)
    }

    async fn find_house(&self, id: Uuid) -> StoreResult<Option<House>> {
        Ok(House::find_by_id(&self.pool, id).await?)
    }

    async fn list_houses(&self) -> StoreResult<Vec<House>> {
        Ok(House::list(&self.pool).await?)
    }

    async fn update_house(&self, house: &House) -> StoreResult<bool> {
        Ok(House::save(&self.pool, house).await?)
    }

    async fn delete_house(&self, id: Uuid) -> StoreResult<bool> {
        Ok(House::delete(&self.pool, id).await?)
    }

    async fn delete_houses_by_owner(&self, owner: Uuid) -> StoreResult<Vec<House>> {
        Ok(House::delete_by_owner(&self.pool, owner).await?)
    }

    async fn create_booking(&self, data: CreateBooking) -> StoreResult<Booking> {
        Ok(Booking::create(&self.pool, data).await?)
    }

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(Booking::find_by_id(&self.pool, id).await?)
    }

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(Booking::list(&self.pool).await?)
    }

    async fn update_booking(&self, booking: &Booking) -> StoreResult<bool> {
        Ok(Booking::save(&self.pool, booking).await?)
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Booking::delete(&self.pool, id).await?)
    }

    async fn delete_bookings_by_house(&self, house: Uuid) -> StoreResult<Vec<Booking>> {
        Ok(Booking::delete_by_house(&self.pool, house).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool).await?)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<bool> {
        Ok(Task::save(&self.pool, task).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn delete_tasks_by_house(&self, house: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::delete_by_house(&self.pool, house).await?)
    }

    async fn delete_tasks_by_work(&self, work: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::delete_by_work(&self.pool, work).await?)
    }

    async fn create_work(&self, data: CreateWork) -> StoreResult<Work> {
        Ok(Work::create(&self.pool, data).await?)
    }

    async fn find_work(&self, id: Uuid) -> StoreResult<Option<Work>> {
        Ok(Work::find_by_id(&self.pool, id).await?)
    }

    async fn list_works(&self) -> StoreResult<Vec<Work>> {
        Ok(Work::list(&self.pool).await?)
    }

    async fn update_work(&self, work: &Work) -> StoreResult<bool> {
        Ok(Work::save(&self.pool, work).await?)
    }

    async fn delete_work(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Work::delete(&self.pool, id).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        User::create(&self.pool, data)
            .await
            .map_err(StoreError::from_write)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    async fn update_user(&self, user: &User) -> StoreResult<bool> {
        User::save(&self.pool, user)
            .await
            .map_err(StoreError::from_write)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        Ok(User::set_password_hash(&self.pool, id, password_hash).await?)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn adjust_counter(
        &self,
        user: Uuid,
        counter: UserCounter,
        delta: i32,
    ) -> StoreResult<bool> {
        Ok(User::adjust_counter(&self.pool, user, counter, delta).await?)
    }

    async fn set_counters(&self, user: Uuid, counters: UserCounters) -> StoreResult<bool> {
        Ok(User::set_counters(&self.pool, user, counters).await?)
    }

    async fn push_ref(&self, list: BackRef, parent: Uuid, child: Uuid) -> StoreResult<bool> {
        Ok(backref::push(&self.pool, list, parent, child).await?)
    }

    async fn pull_ref(&self, list: BackRef, parent: Uuid, child: Uuid) -> StoreResult<bool> {
        Ok(backref::pull(&self.pool, list, parent, child).await?)
    }

    async fn pull_ref_everywhere(&self, list: BackRef, child: Uuid) -> StoreResult<u64> {
        Ok(backref::pull_everywhere(&self.pool, list, child).await?)
    }

    async fn replace_refs(
        &self,
        list: BackRef,
        parent: Uuid,
        children: &[Uuid],
    ) -> StoreResult<bool> {
        Ok(backref::replace(&self.pool, list, parent, children).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
