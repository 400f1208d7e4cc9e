/// Maintenance endpoints
///
/// - `POST /maintenance/reconcile` - Rebuild back-reference lists and user
///   counters from the children's foreign keys

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use hostkeep_shared::auth::middleware::AuthContext;
use hostkeep_shared::error::ServiceError;
use hostkeep_shared::integrity::{self, ReconcileReport};
use tracing::info;

/// Runs a reconciliation pass and returns what was repaired
///
/// # Response
///
/// ```json
/// { "customersRepaired": 0, "housesRepaired": 1, "usersRepaired": 0 }
/// ```
pub async fn reconcile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ReconcileReport>> {
    info!(user_id = %auth.user_id, "Reconciliation requested");

    let report = integrity::reconcile(state.store())
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(report))
}
