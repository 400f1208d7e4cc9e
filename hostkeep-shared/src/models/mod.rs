/// Database models for Hostkeep
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `customer`: Property owners, with a back-reference list of houses
/// - `house`: Properties, with back-reference lists of tasks and bookings
/// - `booking`: Guest stays at a house
/// - `task`: Maintenance jobs scheduled at a house
/// - `work`: Reusable maintenance job definitions
/// - `user`: Staff accounts, authentication and activity counters
/// - `backref`: Array-column primitives for the back-reference lists
///
/// # Example
///
/// ```no_run
/// use hostkeep_shared::models::customer::{Customer, CreateCustomer};
/// use hostkeep_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let customer = Customer::create(&pool, CreateCustomer {
///     first_name: "Ana".to_string(),
///     last_name: "Silva".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod backref;
pub mod booking;
pub mod customer;
pub mod house;
pub mod task;
pub mod user;
pub mod work;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parent-side list that mirrors children's foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackRef {
    /// `customers.houses`, mirrors `houses.owner`
    CustomerHouses,
    /// `houses.tasks`, mirrors `tasks.house`
    HouseTasks,
    /// `houses.bookings`, mirrors `bookings.house`
    HouseBookings,
}

impl BackRef {
    /// Table holding the list
    pub fn table(&self) -> &'static str {
        match self {
            BackRef::CustomerHouses => "customers",
            BackRef::HouseTasks | BackRef::HouseBookings => "houses",
        }
    }

    /// Array column holding the list
    pub fn column(&self) -> &'static str {
        match self {
            BackRef::CustomerHouses => "houses",
            BackRef::HouseTasks => "tasks",
            BackRef::HouseBookings => "bookings",
        }
    }

    /// Kind of the record owning the list
    pub fn parent_kind(&self) -> EntityKind {
        match self {
            BackRef::CustomerHouses => EntityKind::Customer,
            BackRef::HouseTasks | BackRef::HouseBookings => EntityKind::House,
        }
    }
}

impl fmt::Display for BackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table(), self.column())
    }
}

/// Entity kinds known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Customer,
    House,
    Booking,
    Task,
    Work,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "customer",
            EntityKind::House => "house",
            EntityKind::Booking => "booking",
            EntityKind::Task => "task",
            EntityKind::Work => "work",
            EntityKind::User => "user",
        };
        f.write_str(name)
    }
}
