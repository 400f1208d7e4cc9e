//! Entity store
//!
//! [`EntityStore`] is the persistence boundary for every entity kind. The
//! integrity maintainers and services only talk to this trait, so the same
//! logic runs against PostgreSQL in production and [`MemoryStore`] in tests.
//!
//! Each method is one independent store operation. Nothing here groups
//! several operations into a transaction.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::{Booking, CreateBooking};
use crate::models::customer::{CreateCustomer, Customer};
use crate::models::house::{CreateHouse, House};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User, UserCounter, UserCounters};
use crate::models::work::{CreateWork, Work};
use crate::models::BackRef;

/// Errors raised by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write
    #[error("Duplicate value: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Maps unique-violation database errors to [`StoreError::Conflict`]
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Conflict(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for all entity kinds
///
/// `update_*` methods write the record's own fields; back-reference lists
/// and user counters are only changed through the dedicated methods below.
/// They return `false` when the id no longer resolves.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // ========================================================================
    // Customers
    // ========================================================================

    async fn create_customer(&self, data: CreateCustomer) -> StoreResult<Customer>;

    async fn find_customer(&self, id: Uuid) -> StoreResult<Option<Customer>>;

    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    async fn update_customer(&self, customer: &Customer) -> StoreResult<bool>;

    async fn delete_customer(&self, id: Uuid) -> StoreResult<bool>;

    // ========================================================================
    // Houses
    // ========================================================================

    async fn create_house(&self, data: CreateHouse) -> StoreResult<House>;

    async fn find_house(&self, id: Uuid) -> StoreResult<Option<House>>;

    async fn list_houses(&self) -> StoreResult<Vec<House>>;

    /// Writes scalar fields and `owner`
    async fn update_house(&self, house: &House) -> StoreResult<bool>;

    async fn delete_house(&self, id: Uuid) -> StoreResult<bool>;

    /// Bulk delete by owner, returning the removed rows
    async fn delete_houses_by_owner(&self, owner: Uuid) -> StoreResult<Vec<House>>;

    // ========================================================================
    // Bookings
    // ========================================================================

    async fn create_booking(&self, data: CreateBooking) -> StoreResult<Booking>;

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>>;

    async fn update_booking(&self, booking: &Booking) -> StoreResult<bool>;

    async fn delete_booking(&self, id: Uuid) -> StoreResult<bool>;

    async fn delete_bookings_by_house(&self, house: Uuid) -> StoreResult<Vec<Booking>>;

    // ========================================================================
    // Tasks
    // ========================================================================

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    async fn update_task(&self, task: &Task) -> StoreResult<bool>;

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    async fn delete_tasks_by_house(&self, house: Uuid) -> StoreResult<Vec<Task>>;

    async fn delete_tasks_by_work(&self, work: Uuid) -> StoreResult<Vec<Task>>;

    // ========================================================================
    // Works
    // ========================================================================

    async fn create_work(&self, data: CreateWork) -> StoreResult<Work>;

    async fn find_work(&self, id: Uuid) -> StoreResult<Option<Work>>;

    async fn list_works(&self) -> StoreResult<Vec<Work>>;

    async fn update_work(&self, work: &Work) -> StoreResult<bool>;

    async fn delete_work(&self, id: Uuid) -> StoreResult<bool>;

    // ========================================================================
    // Users
    // ========================================================================

    /// Fails with [`StoreError::Conflict`] on duplicate username or email
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Writes profile details (names, email)
    async fn update_user(&self, user: &User) -> StoreResult<bool>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    /// Adds `delta` to one counter, saturating at zero
    async fn adjust_counter(
        &self,
        user: Uuid,
        counter: UserCounter,
        delta: i32,
    ) -> StoreResult<bool>;

    async fn set_counters(&self, user: Uuid, counters: UserCounters) -> StoreResult<bool>;

    // ========================================================================
    // Back-reference lists
    // ========================================================================

    /// Appends `child` to `parent`'s list; `false` if the parent is missing
    async fn push_ref(&self, list: BackRef, parent: Uuid, child: Uuid) -> StoreResult<bool>;

    /// Removes `child` from `parent`'s list; `false` if the parent is missing
    async fn pull_ref(&self, list: BackRef, parent: Uuid, child: Uuid) -> StoreResult<bool>;

    /// Removes `child` from every list of this kind, returning parents touched
    async fn pull_ref_everywhere(&self, list: BackRef, child: Uuid) -> StoreResult<u64>;

    async fn replace_refs(
        &self,
        list: BackRef,
        parent: Uuid,
        children: &[Uuid],
    ) -> StoreResult<bool>;

    // ========================================================================
    // Health
    // ========================================================================

    async fn health_check(&self) -> StoreResult<()>;
}
