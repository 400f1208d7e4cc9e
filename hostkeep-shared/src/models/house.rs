/// House model and database operations
///
/// A house belongs to exactly one customer (`owner`) and carries two
/// back-reference lists, `tasks` and `bookings`, mirroring the child rows
/// whose `house` column points here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE houses (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     label VARCHAR(255) NOT NULL,
///     house_type VARCHAR(100) NOT NULL,
///     address VARCHAR(512) NOT NULL,
///     city VARCHAR(255) NOT NULL,
///     owner UUID NOT NULL,
///     tasks UUID[] NOT NULL DEFAULT '{}',
///     bookings UUID[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// House record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct House {
    /// Unique house ID
    pub id: Uuid,

    /// Short display label
    pub label: String,

    /// House type (apartment, villa, ...)
    #[serde(rename = "type")]
    #[sqlx(rename = "house_type")]
    pub kind: String,

    pub address: String,

    pub city: String,

    /// Owning customer
    pub owner: Uuid,

    /// Back-reference list of task ids
    pub tasks: Vec<Uuid>,

    /// Back-reference list of booking ids
    pub bookings: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a house
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHouse {
    #[validate(length(min = 1, message = "label is required"))]
    pub label: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub kind: String,

    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,

    pub owner: Uuid,
}

/// Partial update for a house
///
/// Changing `owner` re-parents the house.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHouse {
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub label: Option<String>,

    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub kind: Option<String>,

    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,

    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: Option<String>,

    pub owner: Option<Uuid>,
}

impl House {
    /// Builds a fresh house with empty back-reference lists
    pub fn new(data: CreateHouse) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: data.label,
            kind: data.kind,
            address: data.address,
            city: data.city,
            owner: data.owner,
            tasks: Vec::new(),
            bookings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update in place
    pub fn apply(&mut self, update: UpdateHouse) {
        if let Some(label) = update.label {
            self.label = label;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(owner) = update.owner {
            self.owner = owner;
        }
    }

    /// Inserts a new house
    pub async fn create(pool: &PgPool, data: CreateHouse) -> Result<Self, sqlx::Error> {
        let house = sqlx::query_as::<_, House>(
            r#"
            INSERT INTO houses (label, house_type, address, city, owner)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, label, house_type, address, city, owner, tasks, bookings, created_at
            "#,
        )
        .bind(data.label)
        .bind(data.kind)
        .bind(data.address)
        .bind(data.city)
        .bind(data.owner)
        .fetch_one(pool)
        .await?;

        Ok(house)
    }

    /// Finds a house by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let house = sqlx::query_as::<_, House>(
            r#"
            SELECT id, label, house_type, address, city, owner, tasks, bookings, created_at
            FROM houses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(house)
    }

    /// Lists all houses, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let houses = sqlx::query_as::<_, House>(
            r#"
            SELECT id, label, house_type, address, city, owner, tasks, bookings, created_at
            FROM houses
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(houses)
    }

    /// Writes the scalar fields and `owner` back to the row
    ///
    /// `tasks` and `bookings` are left untouched.
    pub async fn save(pool: &PgPool, house: &House) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE houses
            SET label = $2, house_type = $3, address = $4, city = $5, owner = $6
            WHERE id = $1
            "#,
        )
        .bind(house.id)
        .bind(&house.label)
        .bind(&house.kind)
        .bind(&house.address)
        .bind(&house.city)
        .bind(house.owner)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a house by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every house owned by a customer
    ///
    /// # Returns
    ///
    /// The deleted rows, so callers can cascade further
    pub async fn delete_by_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let houses = sqlx::query_as::<_, House>(
            r#"
            DELETE FROM houses
            WHERE owner = $1
            RETURNING id, label, house_type, address, city, owner, tasks, bookings, created_at
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(houses)
    }
}
