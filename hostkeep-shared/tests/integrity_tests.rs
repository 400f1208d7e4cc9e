/// Association, counter and cascade maintenance through the service layer
///
/// Runs against the in-memory store, so no database is needed.

use chrono::{Duration, Utc};
use hostkeep_shared::error::ServiceError;
use hostkeep_shared::integrity::reconcile;
use hostkeep_shared::models::booking::{CreateBooking, UpdateBooking};
use hostkeep_shared::models::customer::{CreateCustomer, Customer};
use hostkeep_shared::models::house::{CreateHouse, House, UpdateHouse};
use hostkeep_shared::models::task::{CreateTask, UpdateTask};
use hostkeep_shared::models::user::{CreateUser, User, UserCounter};
use hostkeep_shared::models::work::{CreateWork, Work};
use hostkeep_shared::models::BackRef;
use hostkeep_shared::services::{bookings, customers, houses, tasks, works};
use hostkeep_shared::store::{EntityStore, MemoryStore};
use uuid::Uuid;

async fn customer(store: &MemoryStore, first: &str) -> Customer {
    customers::add(
        store,
        CreateCustomer {
            first_name: first.to_string(),
            last_name: "Owner".to_string(),
        },
    )
    .await
    .unwrap()
}

async fn house(store: &MemoryStore, owner: Uuid, label: &str) -> House {
    houses::add(
        store,
        CreateHouse {
            label: label.to_string(),
            kind: "apartment".to_string(),
            address: "Rua Augusta 10".to_string(),
            city: "Lisboa".to_string(),
            owner,
        },
    )
    .await
    .unwrap()
    .record
}

async fn work(store: &MemoryStore) -> Work {
    works::add(
        store,
        CreateWork {
            name: "Cleaning".to_string(),
            frequency: "weekly".to_string(),
            advance: 1,
        },
    )
    .await
    .unwrap()
}

async fn staff(store: &MemoryStore, username: &str) -> User {
    store
        .create_user(CreateUser {
            first_name: "Staff".to_string(),
            last_name: username.to_string(),
            username: username.to_string(),
            email: format!("{}@hostkeep.test", username),
            password_hash: "unused".to_string(),
        })
        .await
        .unwrap()
}

fn new_task(house: Uuid, work: Uuid) -> CreateTask {
    CreateTask {
        house,
        work,
        cost: 45.0,
        deadline: Utc::now() + Duration::days(2),
        completed: false,
        completed_by: None,
    }
}

fn new_booking(house: Uuid) -> CreateBooking {
    let check_in = Utc::now() + Duration::days(3);
    CreateBooking {
        guest_first_name: "Guest".to_string(),
        guest_last_name: "One".to_string(),
        house,
        check_in_date: check_in,
        check_out_date: check_in + Duration::days(4),
        check_in_completed: false,
        check_out_completed: false,
        check_in_by: None,
        check_out_by: None,
    }
}

async fn task_count(store: &MemoryStore, user: Uuid) -> i32 {
    store.find_user(user).await.unwrap().unwrap().counters.tasks
}

#[tokio::test]
async fn test_task_lifecycle_keeps_lists_and_counters_in_step() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let cleaner = staff(&store, "cleaner").await;
    let owner = customer(&store, "Carla").await;
    let h1 = house(&store, owner.id, "H1").await;
    let h2 = house(&store, owner.id, "H2").await;
    let w = work(&store).await;

    let owner_row = store.find_customer(owner.id).await.unwrap().unwrap();
    assert_eq!(owner_row.houses, vec![h1.id, h2.id]);

    let task = tasks::add(&store, new_task(h1.id, w.id), actor.id)
        .await
        .unwrap()
        .record;
    assert_eq!(store.find_house(h1.id).await.unwrap().unwrap().tasks, vec![task.id]);

    let outcome = tasks::update(
        &store,
        task.id,
        UpdateTask {
            completed: Some(true),
            completed_by: Some(cleaner.id),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap();
    assert!(outcome.report.is_clean());
    assert_eq!(task_count(&store, cleaner.id).await, 1);
    assert_eq!(task_count(&store, actor.id).await, 0);

    tasks::update(
        &store,
        task.id,
        UpdateTask {
            house: Some(h2.id),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap();
    assert!(store.find_house(h1.id).await.unwrap().unwrap().tasks.is_empty());
    assert_eq!(store.find_house(h2.id).await.unwrap().unwrap().tasks, vec![task.id]);
    // re-parenting alone does not move counters
    assert_eq!(task_count(&store, cleaner.id).await, 1);

    houses::remove(&store, h2.id).await.unwrap();
    assert!(store.find_task(task.id).await.unwrap().is_none());
    assert_eq!(task_count(&store, cleaner.id).await, 0);
    assert_eq!(
        store.find_customer(owner.id).await.unwrap().unwrap().houses,
        vec![h1.id]
    );
}

#[tokio::test]
async fn test_reassigning_completion_moves_credit() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let first = staff(&store, "first").await;
    let second = staff(&store, "second").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;
    let w = work(&store).await;

    let mut data = new_task(h.id, w.id);
    data.completed = true;
    data.completed_by = Some(first.id);
    let task = tasks::add(&store, data, actor.id).await.unwrap().record;
    assert_eq!(task_count(&store, first.id).await, 1);

    tasks::update(
        &store,
        task.id,
        UpdateTask {
            completed_by: Some(second.id),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap();
    assert_eq!(task_count(&store, first.id).await, 0);
    assert_eq!(task_count(&store, second.id).await, 1);

    tasks::update(
        &store,
        task.id,
        UpdateTask {
            completed: Some(false),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap();
    assert_eq!(task_count(&store, second.id).await, 0);
    let reopened = store.find_task(task.id).await.unwrap().unwrap();
    assert!(reopened.completed_by.is_none());
}

#[tokio::test]
async fn test_completion_without_performer_credits_actor() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;
    let w = work(&store).await;

    let task = tasks::add(&store, new_task(h.id, w.id), actor.id)
        .await
        .unwrap()
        .record;
    let updated = tasks::update(
        &store,
        task.id,
        UpdateTask {
            completed: Some(true),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap()
    .record;

    assert_eq!(updated.completed_by, Some(actor.id));
    assert_eq!(task_count(&store, actor.id).await, 1);
}

#[tokio::test]
async fn test_deleting_completed_task_decrements_and_unlinks() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;
    let w = work(&store).await;

    let mut data = new_task(h.id, w.id);
    data.completed = true;
    let task = tasks::add(&store, data, actor.id).await.unwrap().record;
    assert_eq!(task_count(&store, actor.id).await, 1);

    let report = tasks::remove(&store, task.id).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(task_count(&store, actor.id).await, 0);
    assert!(store.find_house(h.id).await.unwrap().unwrap().tasks.is_empty());
}

#[tokio::test]
async fn test_booking_check_in_and_out_counters() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let host = staff(&store, "host").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;

    let booking = bookings::add(&store, new_booking(h.id), actor.id)
        .await
        .unwrap()
        .record;
    assert_eq!(store.find_house(h.id).await.unwrap().unwrap().bookings, vec![booking.id]);

    bookings::update(
        &store,
        booking.id,
        UpdateBooking {
            check_in_completed: Some(true),
            check_in_by: Some(host.id),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap();
    bookings::update(
        &store,
        booking.id,
        UpdateBooking {
            check_out_completed: Some(true),
            ..Default::default()
        },
        actor.id,
    )
    .await
    .unwrap();

    let host_row = store.find_user(host.id).await.unwrap().unwrap();
    let actor_row = store.find_user(actor.id).await.unwrap().unwrap();
    assert_eq!(host_row.counters.check_ins, 1);
    assert_eq!(host_row.counters.check_outs, 0);
    assert_eq!(actor_row.counters.check_outs, 1);

    bookings::remove(&store, booking.id).await.unwrap();
    let host_row = store.find_user(host.id).await.unwrap().unwrap();
    let actor_row = store.find_user(actor.id).await.unwrap().unwrap();
    assert_eq!(host_row.counters.check_ins, 0);
    assert_eq!(actor_row.counters.check_outs, 0);
    assert!(store.find_house(h.id).await.unwrap().unwrap().bookings.is_empty());
}

#[tokio::test]
async fn test_booking_rejects_inverted_stay() {
    let store = MemoryStore::default();
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;

    let mut data = new_booking(h.id);
    data.check_out_date = data.check_in_date - Duration::days(1);

    let err = bookings::add(&store, data, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { .. }));
    assert!(store.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_house_owner_change_relinks_customers() {
    let store = MemoryStore::default();
    let first = customer(&store, "First").await;
    let second = customer(&store, "Second").await;
    let h = house(&store, first.id, "H").await;

    let outcome = houses::update(
        &store,
        h.id,
        UpdateHouse {
            owner: Some(second.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(outcome.report.is_clean());
    assert!(store.find_customer(first.id).await.unwrap().unwrap().houses.is_empty());
    assert_eq!(
        store.find_customer(second.id).await.unwrap().unwrap().houses,
        vec![h.id]
    );
}

#[tokio::test]
async fn test_house_with_missing_owner_is_created_and_reported() {
    let store = MemoryStore::default();

    let outcome = houses::add(
        &store,
        CreateHouse {
            label: "Orphan".to_string(),
            kind: "villa".to_string(),
            address: "Nowhere 1".to_string(),
            city: "Faro".to_string(),
            owner: Uuid::new_v4(),
        },
    )
    .await
    .unwrap();

    assert!(!outcome.report.is_clean());
    assert!(store.find_house(outcome.record.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_customer_removal_cascades_to_everything_below() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let owner = customer(&store, "Carla").await;
    let keep = customer(&store, "Keep").await;
    let h1 = house(&store, owner.id, "H1").await;
    let h2 = house(&store, owner.id, "H2").await;
    let kept_house = house(&store, keep.id, "K").await;
    let w = work(&store).await;

    let mut done = new_task(h1.id, w.id);
    done.completed = true;
    tasks::add(&store, done, actor.id).await.unwrap();
    tasks::add(&store, new_task(h2.id, w.id), actor.id).await.unwrap();
    bookings::add(&store, new_booking(h2.id), actor.id).await.unwrap();
    let kept_task = tasks::add(&store, new_task(kept_house.id, w.id), actor.id)
        .await
        .unwrap()
        .record;

    let report = customers::remove(&store, owner.id).await.unwrap();

    assert_eq!(report.removed.houses, 2);
    assert_eq!(report.removed.tasks, 2);
    assert_eq!(report.removed.bookings, 1);
    assert!(store.find_customer(owner.id).await.unwrap().is_none());
    assert_eq!(store.list_houses().await.unwrap().len(), 1);
    assert_eq!(
        store.list_tasks().await.unwrap().iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![kept_task.id]
    );
    assert!(store.list_bookings().await.unwrap().is_empty());
    assert_eq!(task_count(&store, actor.id).await, 0);
}

#[tokio::test]
async fn test_work_removal_deletes_its_tasks() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;
    let cleaning = work(&store).await;
    let garden = works::add(
        &store,
        CreateWork {
            name: "Garden".to_string(),
            frequency: "monthly".to_string(),
            advance: 3,
        },
    )
    .await
    .unwrap();

    let mut done = new_task(h.id, cleaning.id);
    done.completed = true;
    tasks::add(&store, done, actor.id).await.unwrap();
    let other = tasks::add(&store, new_task(h.id, garden.id), actor.id)
        .await
        .unwrap()
        .record;

    let report = works::remove(&store, cleaning.id).await.unwrap();

    assert_eq!(report.removed.tasks, 1);
    assert_eq!(store.find_house(h.id).await.unwrap().unwrap().tasks, vec![other.id]);
    assert_eq!(task_count(&store, actor.id).await, 0);
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let store = MemoryStore::default();
    let id = Uuid::new_v4();

    let err = customers::remove(&store, id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Cannot find customer '{}'", id));
    assert!(houses::get(&store, id).await.is_err());
    assert!(tasks::remove(&store, id).await.is_err());
    assert!(works::get(&store, id).await.is_err());
}

#[tokio::test]
async fn test_populated_reads_inline_related_records() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;
    let w = work(&store).await;
    let task = tasks::add(&store, new_task(h.id, w.id), actor.id)
        .await
        .unwrap()
        .record;
    let booking = bookings::add(&store, new_booking(h.id), actor.id)
        .await
        .unwrap()
        .record;

    let detail = houses::get(&store, h.id).await.unwrap();
    assert_eq!(detail.owner.as_ref().map(|c| c.id), Some(owner.id));
    assert_eq!(detail.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![task.id]);
    assert_eq!(detail.bookings.iter().map(|b| b.id).collect::<Vec<_>>(), vec![booking.id]);

    let customer_detail = customers::get(&store, owner.id).await.unwrap();
    assert_eq!(customer_detail.houses.len(), 1);
    assert_eq!(customer_detail.houses[0].tasks[0].id, task.id);
    assert_eq!(customer_detail.houses[0].tasks[0].cost, 45.0);

    let view = tasks::get(&store, task.id).await.unwrap();
    assert_eq!(view.work.map(|w| w.name), Some("Cleaning".to_string()));
}

#[tokio::test]
async fn test_reconcile_repairs_drift_and_is_idempotent() {
    let store = MemoryStore::default();
    let actor = staff(&store, "actor").await;
    let owner = customer(&store, "Carla").await;
    let h = house(&store, owner.id, "H").await;
    let w = work(&store).await;

    let mut done = new_task(h.id, w.id);
    done.completed = true;
    let task = tasks::add(&store, done, actor.id).await.unwrap().record;

    // simulate lost maintenance writes
    store.replace_refs(BackRef::CustomerHouses, owner.id, &[]).await.unwrap();
    store
        .replace_refs(BackRef::HouseTasks, h.id, &[task.id, Uuid::new_v4()])
        .await
        .unwrap();
    store.adjust_counter(actor.id, UserCounter::CheckIns, 3).await.unwrap();

    let report = reconcile(&store).await.unwrap();
    assert_eq!(report.customers_repaired, 1);
    assert_eq!(report.houses_repaired, 1);
    assert_eq!(report.users_repaired, 1);

    assert_eq!(store.find_customer(owner.id).await.unwrap().unwrap().houses, vec![h.id]);
    assert_eq!(store.find_house(h.id).await.unwrap().unwrap().tasks, vec![task.id]);
    let counters = store.find_user(actor.id).await.unwrap().unwrap().counters;
    assert_eq!(counters.tasks, 1);
    assert_eq!(counters.check_ins, 0);

    let again = reconcile(&store).await.unwrap();
    assert_eq!(again.total(), 0);
}
