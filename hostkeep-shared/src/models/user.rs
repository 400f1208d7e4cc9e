/// User model and database operations
///
/// Users are the staff members who log in, complete tasks and perform
/// check-ins/check-outs. Each user carries three derived counters that the
/// integrity maintainers keep in step with the task and booking rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     tasks_completed INTEGER NOT NULL DEFAULT 0,
///     check_ins INTEGER NOT NULL DEFAULT 0,
///     check_outs INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// User account
///
/// Passwords are stored as Argon2id hashes and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Login name, always lowercase
    pub username: String,

    /// Always lowercase
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    #[sqlx(flatten)]
    pub counters: UserCounters,

    pub created_at: DateTime<Utc>,
}

/// Derived per-user activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserCounters {
    /// Tasks currently completed by this user
    #[sqlx(rename = "tasks_completed")]
    pub tasks: i32,

    pub check_ins: i32,

    pub check_outs: i32,
}

/// Selects one of the [`UserCounters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserCounter {
    Tasks,
    CheckIns,
    CheckOuts,
}

impl UserCounter {
    /// Column backing this counter
    pub fn column(&self) -> &'static str {
        match self {
            UserCounter::Tasks => "tasks_completed",
            UserCounter::CheckIns => "check_ins",
            UserCounter::CheckOuts => "check_outs",
        }
    }
}

impl fmt::Display for UserCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserCounter::Tasks => write!(f, "tasks"),
            UserCounter::CheckIns => write!(f, "checkIns"),
            UserCounter::CheckOuts => write!(f, "checkOuts"),
        }
    }
}

impl UserCounters {
    /// Adds `delta` to one counter, never dropping below zero
    pub fn adjust(&mut self, counter: UserCounter, delta: i32) {
        let slot = match counter {
            UserCounter::Tasks => &mut self.tasks,
            UserCounter::CheckIns => &mut self.check_ins,
            UserCounter::CheckOuts => &mut self.check_outs,
        };
        *slot = (*slot + delta).max(0);
    }
}

/// Input for creating a user
///
/// The password must already be hashed; see `auth::password`.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Detail update for a user's own profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "firstName must not be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "lastName must not be empty"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl User {
    /// Builds a fresh user with zeroed counters
    pub fn new(data: CreateUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: data.first_name,
            last_name: data.last_name,
            username: data.username.to_lowercase(),
            email: data.email.to_lowercase(),
            password_hash: data.password_hash,
            counters: UserCounters::default(),
            created_at: Utc::now(),
        }
    }

    /// Applies a detail update in place
    pub fn apply(&mut self, update: UpdateUser) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email.to_lowercase();
        }
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a database error if the username or email already exists
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, username, email, password_hash,
                      tasks_completed, check_ins, check_outs, created_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.username.to_lowercase())
        .bind(data.email.to_lowercase())
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   tasks_completed, check_ins, check_outs, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-insensitive)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   tasks_completed, check_ins, check_outs, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   tasks_completed, check_ins, check_outs, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash,
                   tasks_completed, check_ins, check_outs, created_at
            FROM users
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Writes profile details back to the row
    ///
    /// Counters and the password hash are left untouched.
    pub async fn save(pool: &PgPool, user: &User) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, email = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the stored password hash
    pub async fn set_password_hash(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Adds `delta` to one counter in a single statement, clamped at zero
    pub async fn adjust_counter(
        pool: &PgPool,
        id: Uuid,
        counter: UserCounter,
        delta: i32,
    ) -> Result<bool, sqlx::Error> {
        let column = counter.column();
        let query = format!(
            "UPDATE users SET {column} = GREATEST({column} + $2, 0) WHERE id = $1"
        );

        let result = sqlx::query(&query)
            .bind(id)
            .bind(delta)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrites all counters (used by reconciliation)
    pub async fn set_counters(
        pool: &PgPool,
        id: Uuid,
        counters: UserCounters,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET tasks_completed = $2, check_ins = $3, check_outs = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(counters.tasks)
        .bind(counters.check_ins)
        .bind(counters.check_outs)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
