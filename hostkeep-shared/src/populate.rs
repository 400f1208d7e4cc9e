//! Reference-following reads
//!
//! Read endpoints return records with related records inlined in place of
//! their ids. A dangling single reference becomes `null`; dangling ids in a
//! list are skipped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::customer::Customer;
use crate::models::house::House;
use crate::models::task::Task;
use crate::models::work::Work;
use crate::store::{EntityStore, StoreResult};

/// House with its owner and lists rendered as `O`, `T` and `B`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedHouse<O, T, B> {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub city: String,
    pub owner: O,
    pub tasks: Vec<T>,
    pub bookings: Vec<B>,
    pub created_at: DateTime<Utc>,
}

impl<O, T, B> PopulatedHouse<O, T, B> {
    fn from_house(house: House, owner: O, tasks: Vec<T>, bookings: Vec<B>) -> Self {
        Self {
            id: house.id,
            label: house.label,
            kind: house.kind,
            address: house.address,
            city: house.city,
            owner,
            tasks,
            bookings,
            created_at: house.created_at,
        }
    }
}

/// `GET /houses` item: owner inlined
pub type HouseSummary = PopulatedHouse<Option<Customer>, Uuid, Uuid>;

/// `GET /houses/:id`: owner, tasks and bookings inlined
pub type HouseDetail = PopulatedHouse<Option<Customer>, Task, Booking>;

/// House as nested under a customer: tasks reduced to their cost
pub type CustomerHouse = PopulatedHouse<Uuid, TaskCost, Uuid>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskCost {
    pub id: Uuid,
    pub cost: f64,
}

/// `GET /customers/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub houses: Vec<CustomerHouse>,
    pub created_at: DateTime<Utc>,
}

/// Booking with its house inlined
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub guest_first_name: String,
    pub guest_last_name: String,
    pub house: Option<House>,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub check_in_completed: bool,
    pub check_out_completed: bool,
    pub check_in_by: Option<Uuid>,
    pub check_out_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl BookingView {
    fn new(booking: Booking, house: Option<House>) -> Self {
        Self {
            id: booking.id,
            guest_first_name: booking.guest_first_name,
            guest_last_name: booking.guest_last_name,
            house,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            check_in_completed: booking.check_in_completed,
            check_out_completed: booking.check_out_completed,
            check_in_by: booking.check_in_by,
            check_out_by: booking.check_out_by,
            created_at: booking.created_at,
        }
    }
}

/// Task with its house and work inlined
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub house: Option<House>,
    pub work: Option<Work>,
    pub cost: f64,
    pub deadline: DateTime<Utc>,
    pub completed: bool,
    pub completed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TaskView {
    fn new(task: Task, house: Option<House>, work: Option<Work>) -> Self {
        Self {
            id: task.id,
            house,
            work,
            cost: task.cost,
            deadline: task.deadline,
            completed: task.completed,
            completed_by: task.completed_by,
            created_at: task.created_at,
        }
    }
}

fn index<T, F: Fn(&T) -> Uuid>(rows: Vec<T>, key: F) -> HashMap<Uuid, T> {
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

pub async fn houses(store: &dyn EntityStore) -> StoreResult<Vec<HouseSummary>> {
    let customers = index(store.list_customers().await?, |c| c.id);
    let houses = store.list_houses().await?;

    Ok(houses
        .into_iter()
        .map(|house| {
            let owner = customers.get(&house.owner).cloned();
            let (tasks, bookings) = (house.tasks.clone(), house.bookings.clone());
            PopulatedHouse::from_house(house, owner, tasks, bookings)
        })
        .collect())
}

pub async fn house(store: &dyn EntityStore, id: Uuid) -> StoreResult<Option<HouseDetail>> {
    let Some(house) = store.find_house(id).await? else {
        return Ok(None);
    };

    let owner = store.find_customer(house.owner).await?;

    let mut tasks = Vec::with_capacity(house.tasks.len());
    for task_id in &house.tasks {
        if let Some(task) = store.find_task(*task_id).await? {
            tasks.push(task);
        }
    }

    let mut bookings = Vec::with_capacity(house.bookings.len());
    for booking_id in &house.bookings {
        if let Some(booking) = store.find_booking(*booking_id).await? {
            bookings.push(booking);
        }
    }

    Ok(Some(PopulatedHouse::from_house(house, owner, tasks, bookings)))
}

pub async fn customer(store: &dyn EntityStore, id: Uuid) -> StoreResult<Option<CustomerDetail>> {
    let Some(customer) = store.find_customer(id).await? else {
        return Ok(None);
    };

    let mut houses = Vec::with_capacity(customer.houses.len());
    for house_id in &customer.houses {
        let Some(house) = store.find_house(*house_id).await? else {
            continue;
        };

        let mut costs = Vec::with_capacity(house.tasks.len());
        for task_id in &house.tasks {
            if let Some(task) = store.find_task(*task_id).await? {
                costs.push(TaskCost {
                    id: task.id,
                    cost: task.cost,
                });
            }
        }

        let (owner, bookings) = (house.owner, house.bookings.clone());
        houses.push(PopulatedHouse::from_house(house, owner, costs, bookings));
    }

    Ok(Some(CustomerDetail {
        id: customer.id,
        first_name: customer.first_name,
        last_name: customer.last_name,
        houses,
        created_at: customer.created_at,
    }))
}

pub async fn bookings(store: &dyn EntityStore) -> StoreResult<Vec<BookingView>> {
    let houses = index(store.list_houses().await?, |h| h.id);
    let bookings = store.list_bookings().await?;

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let house = houses.get(&booking.house).cloned();
            BookingView::new(booking, house)
        })
        .collect())
}

pub async fn booking(store: &dyn EntityStore, id: Uuid) -> StoreResult<Option<BookingView>> {
    let Some(booking) = store.find_booking(id).await? else {
        return Ok(None);
    };
    let house = store.find_house(booking.house).await?;
    Ok(Some(BookingView::new(booking, house)))
}

pub async fn tasks(store: &dyn EntityStore) -> StoreResult<Vec<TaskView>> {
    let houses = index(store.list_houses().await?, |h| h.id);
    let works = index(store.list_works().await?, |w| w.id);
    let tasks = store.list_tasks().await?;

    Ok(tasks
        .into_iter()
        .map(|task| {
            let house = houses.get(&task.house).cloned();
            let work = works.get(&task.work).cloned();
            TaskView::new(task, house, work)
        })
        .collect())
}

pub async fn task(store: &dyn EntityStore, id: Uuid) -> StoreResult<Option<TaskView>> {
    let Some(task) = store.find_task(id).await? else {
        return Ok(None);
    };
    let house = store.find_house(task.house).await?;
    let work = store.find_work(task.work).await?;
    Ok(Some(TaskView::new(task, house, work)))
}
