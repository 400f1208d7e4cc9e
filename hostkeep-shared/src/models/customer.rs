/// Customer model and database operations
///
/// Customers own houses. The `houses` column is a denormalized list of the
/// ids of every house whose `owner` is this customer; it is written only by
/// the integrity maintainers, never by create/update payloads.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     houses UUID[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer ID
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Back-reference list of owned house ids
    pub houses: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
}

/// Partial update for a customer
///
/// Only non-None fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    #[validate(length(min = 1, message = "firstName must not be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "lastName must not be empty"))]
    pub last_name: Option<String>,
}

impl Customer {
    /// Builds a fresh customer with a generated id and an empty house list
    pub fn new(data: CreateCustomer) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: data.first_name,
            last_name: data.last_name,
            houses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update in place
    pub fn apply(&mut self, update: UpdateCustomer) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
    }

    /// Inserts a new customer
    pub async fn create(pool: &PgPool, data: CreateCustomer) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (first_name, last_name)
            VALUES ($1, $2)
            RETURNING id, first_name, last_name, houses, created_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, houses, created_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, houses, created_at
            FROM customers
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Writes the scalar fields of `customer` back to its row
    ///
    /// The `houses` list is left untouched.
    ///
    /// # Returns
    ///
    /// True if the row existed
    pub async fn save(pool: &PgPool, customer: &Customer) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET first_name = $2, last_name = $3
            WHERE id = $1
            "#,
        )
        .bind(customer.id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a customer by ID
    ///
    /// Owned houses are not touched here; see `integrity::cascade`.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
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
    fn test_apply_partial_update() {
        let mut customer = Customer::new(CreateCustomer {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
        });

        customer.apply(UpdateCustomer {
            last_name: Some("Costa".to_string()),
            ..Default::default()
        });

        assert_eq!(customer.first_name, "Ana");
        assert_eq!(customer.last_name, "Costa");
        assert!(customer.houses.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let customer = Customer::new(CreateCustomer {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
        });

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["firstName"], "Ana");
        assert!(json["houses"].as_array().unwrap().is_empty());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_create_validation() {
        let data = CreateCustomer {
            first_name: String::new(),
            last_name: "Silva".to_string(),
        };
        assert!(data.validate().is_err());
    }
}
