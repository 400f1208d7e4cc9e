/// Task model and database operations
///
/// A task is one scheduled occurrence of a [`Work`](super::work::Work) at a
/// house. Completing a task credits the staff member in `completed_by`.
///
/// # Completion State
///
/// ```text
/// open ──complete(by)──▶ completed(by)
///   ▲                        │
///   └──────reopen────────────┘   (completed_by is cleared)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     house UUID NOT NULL,
///     work UUID NOT NULL,
///     cost DOUBLE PRECISION NOT NULL,
///     deadline TIMESTAMPTZ NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_by UUID,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// House the task is performed at
    pub house: Uuid,

    /// Work definition this task instantiates
    pub work: Uuid,

    pub cost: f64,

    pub deadline: DateTime<Utc>,

    pub completed: bool,

    /// Staff member credited with completion (only set while completed)
    pub completed_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub house: Uuid,

    pub work: Uuid,

    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost: f64,

    pub deadline: DateTime<Utc>,

    #[serde(default)]
    pub completed: bool,

    pub completed_by: Option<Uuid>,
}

/// Partial update for a task
///
/// Changing `house` re-parents the task; toggling `completed` moves the
/// completion counter of the users involved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub house: Option<Uuid>,

    pub work: Option<Uuid>,

    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost: Option<f64>,

    pub deadline: Option<DateTime<Utc>>,

    pub completed: Option<bool>,

    pub completed_by: Option<Uuid>,
}

impl Task {
    /// Builds a fresh task with a generated id
    pub fn new(data: CreateTask) -> Self {
        let mut task = Self {
            id: Uuid::new_v4(),
            house: data.house,
            work: data.work,
            cost: data.cost,
            deadline: data.deadline,
            completed: data.completed,
            completed_by: data.completed_by,
            created_at: Utc::now(),
        };
        task.normalize();
        task
    }

    /// Applies a partial update in place
    pub fn apply(&mut self, update: UpdateTask) {
        if let Some(house) = update.house {
            self.house = house;
        }
        if let Some(work) = update.work {
            self.work = work;
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if update.completed_by.is_some() {
            self.completed_by = update.completed_by;
        }
        self.normalize();
    }

    /// Drops `completed_by` from a task that is not completed
    pub fn normalize(&mut self) {
        if !self.completed {
            self.completed_by = None;
        }
    }

    /// Inserts a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (house, work, cost, deadline, completed, completed_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, house, work, cost, deadline, completed, completed_by, created_at
            "#,
        )
        .bind(data.house)
        .bind(data.work)
        .bind(data.cost)
        .bind(data.deadline)
        .bind(data.completed)
        .bind(data.completed_by.filter(|_| data.completed))
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, house, work, cost, deadline, completed, completed_by, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, house, work, cost, deadline, completed, completed_by, created_at
            FROM tasks
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Writes every field except `id` and `created_at` back to the row
    pub async fn save(pool: &PgPool, task: &Task) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET house = $2, work = $3, cost = $4, deadline = $5,
                completed = $6, completed_by = $7
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(task.house)
        .bind(task.work)
        .bind(task.cost)
        .bind(task.deadline)
        .bind(task.completed)
        .bind(task.completed_by)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every task of a house, returning the deleted rows
    pub async fn delete_by_house(pool: &PgPool, house: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE house = $1
            RETURNING id, house, work, cost, deadline, completed, completed_by, created_at
            "#,
        )
        .bind(house)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes every task instantiating a work, returning the deleted rows
    pub async fn delete_by_work(pool: &PgPool, work: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE work = $1
            RETURNING id, house, work, cost, deadline, completed, completed_by, created_at
            "#,
        )
        .bind(work)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}
