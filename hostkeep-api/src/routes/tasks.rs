/// Task endpoints
///
/// - `POST /tasks` - Create a task and link it to its house
/// - `GET /tasks`, `GET /tasks/:id` - Tasks with house and work inlined
/// - `PUT /tasks/:id` - Update; re-parents on a new `house`, moves the
///   completion counter on completion changes
/// - `DELETE /tasks/:id` - Delete and unlink

use super::{created_with_report, Created, Payload, RecordId};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use hostkeep_shared::auth::middleware::AuthContext;
use hostkeep_shared::models::task::{CreateTask, Task, UpdateTask};
use hostkeep_shared::populate::TaskView;
use hostkeep_shared::services::tasks;

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(req): Payload<CreateTask>,
) -> ApiResult<Json<Created<Task>>> {
    let outcome = tasks::add(state.store(), req, auth.user_id).await?;
    Ok(created_with_report(outcome))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskView>>> {
    Ok(Json(tasks::list(state.store()).await?))
}

pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<Json<TaskView>> {
    Ok(Json(tasks::get(state.store(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    RecordId(id): RecordId,
    Payload(req): Payload<UpdateTask>,
) -> ApiResult<StatusCode> {
    tasks::update(state.store(), id, req, auth.user_id).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<StatusCode> {
    tasks::remove(state.store(), id).await?;
    Ok(StatusCode::OK)
}
