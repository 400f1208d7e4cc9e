//! Back-reference list maintenance
//!
//! The child's foreign key is authoritative; these helpers keep the parent's
//! list in step with it. Failures are recorded, never returned.

use tracing::debug;
use uuid::Uuid;

use super::report::{ConsistencyReport, MaintenanceStep};
use crate::models::BackRef;
use crate::store::EntityStore;

fn target(list: BackRef, parent: Uuid) -> String {
    format!("{}/{}", list, parent)
}

/// Appends a newly created child to its parent's list
pub async fn link(
    store: &dyn EntityStore,
    list: BackRef,
    parent: Uuid,
    child: Uuid,
    report: &mut ConsistencyReport,
) {
    match store.push_ref(list, parent, child).await {
        Ok(true) => debug!(%list, %parent, %child, "Linked child to parent"),
        Ok(false) => report.record(
            MaintenanceStep::Link,
            target(list, parent),
            format!("{} '{}' not found", list.parent_kind(), parent),
        ),
        Err(e) => report.record(MaintenanceStep::Link, target(list, parent), e.to_string()),
    }
}

/// Moves a child from `old` to `new`
///
/// The old parent is always cleaned up before the new one is written. A
/// missing old parent is not an issue; a missing new parent is.
pub async fn relink(
    store: &dyn EntityStore,
    list: BackRef,
    old: Uuid,
    new: Uuid,
    child: Uuid,
    report: &mut ConsistencyReport,
) {
    if old == new {
        return;
    }

    if let Err(e) = store.pull_ref(list, old, child).await {
        report.record(MaintenanceStep::Unlink, target(list, old), e.to_string());
    }

    link(store, list, new, child, report).await;
}

/// Removes a deleted child from every list of this kind that holds it
pub async fn unlink(
    store: &dyn EntityStore,
    list: BackRef,
    child: Uuid,
    report: &mut ConsistencyReport,
) {
    match store.pull_ref_everywhere(list, child).await {
        Ok(touched) => debug!(%list, %child, touched, "Unlinked child"),
        Err(e) => report.record(
            MaintenanceStep::Unlink,
            format!("{}/*", list),
            e.to_string(),
        ),
    }
}
