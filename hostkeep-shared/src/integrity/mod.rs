//! Referential-integrity maintenance
//!
//! Children own their foreign keys (`house.owner`, `task.house`,
//! `booking.house`, `task.work`). Parents carry derived lists of child ids and
//! users carry derived counters. The maintainers here keep the derived data
//! in step, one independent store operation at a time:
//!
//! - [`associations`]: parent back-reference lists on create, re-parent, delete
//! - [`counters`]: user counters on completion-state transitions
//! - [`cascade`]: dependants of a deleted customer, house or work
//! - [`reconcile`]: full rebuild of all derived data
//!
//! Nothing here is transactional. Failed steps land in a
//! [`ConsistencyReport`] instead of failing the primary operation, and
//! [`reconcile::reconcile`] is the repair path.

pub mod associations;
pub mod cascade;
pub mod counters;
pub mod reconcile;
pub mod report;

pub use reconcile::{reconcile, ReconcileReport};
pub use report::{ConsistencyIssue, ConsistencyReport, MaintenanceStep, Outcome};
