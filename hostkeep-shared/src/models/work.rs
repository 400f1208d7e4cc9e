/// Work model and database operations
///
/// A work is a reusable definition of a maintenance job (cleaning, garden,
/// pool service...). Tasks reference a work; deleting a work deletes its
/// tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE works (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     frequency VARCHAR(100) NOT NULL,
///     advance INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Work definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: Uuid,

    pub name: String,

    /// How often the work recurs (free text, e.g. "weekly")
    pub frequency: String,

    /// Lead time before the deadline, in days
    pub advance: i32,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWork {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "frequency is required"))]
    pub frequency: String,

    #[validate(range(min = 0, message = "advance must not be negative"))]
    pub advance: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWork {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "frequency must not be empty"))]
    pub frequency: Option<String>,

    #[validate(range(min = 0, message = "advance must not be negative"))]
    pub advance: Option<i32>,
}

impl Work {
    pub fn new(data: CreateWork) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            frequency: data.frequency,
            advance: data.advance,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: UpdateWork) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(advance) = update.advance {
            self.advance = advance;
        }
    }

    pub async fn create(pool: &PgPool, data: CreateWork) -> Result<Self, sqlx::Error> {
        let work = sqlx::query_as::<_, Work>(
            r#"
            INSERT INTO works (name, frequency, advance)
            VALUES ($1, $2, $3)
            RETURNING id, name, frequency, advance, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.frequency)
        .bind(data.advance)
        .fetch_one(pool)
        .await?;

        Ok(work)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let work = sqlx::query_as::<_, Work>(
            "SELECT id, name, frequency, advance, created_at FROM works WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(work)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let works = sqlx::query_as::<_, Work>(
            "SELECT id, name, frequency, advance, created_at FROM works ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(works)
    }

    pub async fn save(pool: &PgPool, work: &Work) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE works SET name = $2, frequency = $3, advance = $4 WHERE id = $1",
        )
        .bind(work.id)
        .bind(&work.name)
        .bind(&work.frequency)
        .bind(work.advance)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM works WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_advance_rejected() {
        let data = CreateWork {
            name: "Pool cleaning".to_string(),
            frequency: "weekly".to_string(),
            advance: -1,
        };
        assert!(data.validate().is_err());
    }
}
