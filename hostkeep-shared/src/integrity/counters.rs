//! User counter maintenance
//!
//! A counter tracks how many records are currently completed by a user. The
//! counted records are tasks (`completed`/`completedBy`) and the two steps of
//! a booking (`checkInCompleted`/`checkInBy`, `checkOutCompleted`/`checkOutBy`).
//!
//! All three use one transition table:
//!
//! | before    | after     | effect                         |
//! |-----------|-----------|--------------------------------|
//! | open      | done(u)   | +1 u                           |
//! | done(u)   | open      | -1 u                           |
//! | done(u)   | done(u)   | none                           |
//! | done(u)   | done(v)   | +1 v, -1 u                     |
//! | open      | open      | none                           |
//!
//! Creation is a transition from open, deletion a transition to open.

use uuid::Uuid;

use super::report::{ConsistencyReport, MaintenanceStep};
use crate::models::booking::Booking;
use crate::models::task::Task;
use crate::models::user::UserCounter;
use crate::store::EntityStore;

/// Completion state of one counted step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub completed: bool,
    pub by: Option<Uuid>,
}

impl Completion {
    pub const OPEN: Completion = Completion {
        completed: false,
        by: None,
    };

    pub fn new(completed: bool, by: Option<Uuid>) -> Self {
        Self { completed, by }
    }

    /// User credited by this state, if any
    fn credited(&self) -> Option<Uuid> {
        if self.completed {
            self.by
        } else {
            None
        }
    }

    pub fn of_task(task: &Task) -> Self {
        Self::new(task.completed, task.completed_by)
    }

    pub fn of_check_in(booking: &Booking) -> Self {
        Self::new(booking.check_in_completed, booking.check_in_by)
    }

    pub fn of_check_out(booking: &Booking) -> Self {
        Self::new(booking.check_out_completed, booking.check_out_by)
    }
}

/// Counter deltas for a state change, decrement first
pub fn transition(before: Completion, after: Completion) -> Vec<(Uuid, i32)> {
    match (before.credited(), after.credited()) {
        (Some(prev), Some(next)) if prev == next => Vec::new(),
        (prev, next) => prev
            .map(|user| (user, -1))
            .into_iter()
            .chain(next.map(|user| (user, 1)))
            .collect(),
    }
}

/// Applies the deltas of one transition to `counter`
pub async fn apply(
    store: &dyn EntityStore,
    counter: UserCounter,
    before: Completion,
    after: Completion,
    report: &mut ConsistencyReport,
) {
    for (user, delta) in transition(before, after) {
        let target = format!("users.{}/{}", counter, user);
        match store.adjust_counter(user, counter, delta).await {
            Ok(true) => {}
            Ok(false) => report.record(
                MaintenanceStep::Counter,
                target,
                format!("user '{}' not found", user),
            ),
            Err(e) => report.record(MaintenanceStep::Counter, target, e.to_string()),
        }
    }
}

pub async fn task_changed(
    store: &dyn EntityStore,
    before: Option<&Task>,
    after: Option<&Task>,
    report: &mut ConsistencyReport,
) {
    let before = before.map_or(Completion::OPEN, Completion::of_task);
    let after = after.map_or(Completion::OPEN, Completion::of_task);
    apply(store, UserCounter::Tasks, before, after, report).await;
}

/// Moves both booking counters for a booking created, updated or deleted
pub async fn booking_changed(
    store: &dyn EntityStore,
    before: Option<&Booking>,
    after: Option<&Booking>,
    report: &mut ConsistencyReport,
) {
    let check_in = |b: Option<&Booking>| b.map_or(Completion::OPEN, Completion::of_check_in);
    let (in_before, in_after) = (check_in(before), check_in(after));
    let check_out = |b: Option<&Booking>| b.map_or(Completion::OPEN, Completion::of_check_out);
    let (out_before, out_after) = (check_out(before), check_out(after));

    apply(store, UserCounter::CheckIns, in_before, in_after, report).await;
    apply(store, UserCounter::CheckOuts, out_before, out_after, report).await;
}
