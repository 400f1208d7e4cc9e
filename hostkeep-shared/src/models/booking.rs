/// Booking model and database operations
///
/// A booking belongs to one house. Check-in and check-out each carry a
/// completion flag and the staff member who performed it; those pairs feed
/// the `checkIns` / `checkOuts` user counters.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE bookings (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     guest_first_name VARCHAR(255) NOT NULL,
///     guest_last_name VARCHAR(255) NOT NULL,
///     house UUID NOT NULL,
///     check_in_date TIMESTAMPTZ NOT NULL,
///     check_out_date TIMESTAMPTZ NOT NULL,
///     check_in_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     check_out_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     check_in_by UUID,
///     check_out_by UUID,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Booking record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,

    pub guest_first_name: String,

    pub guest_last_name: String,

    /// House this booking is for
    pub house: Uuid,

    pub check_in_date: DateTime<Utc>,

    pub check_out_date: DateTime<Utc>,

    pub check_in_completed: bool,

    pub check_out_completed: bool,

    /// Staff member who performed the check-in
    pub check_in_by: Option<Uuid>,

    /// Staff member who performed the check-out
    pub check_out_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(length(min = 1, message = "guestFirstName is required"))]
    pub guest_first_name: String,

    #[validate(length(min = 1, message = "guestLastName is required"))]
    pub guest_last_name: String,

    pub house: Uuid,

    pub check_in_date: DateTime<Utc>,

    pub check_out_date: DateTime<Utc>,

    #[serde(default)]
    pub check_in_completed: bool,

    #[serde(default)]
    pub check_out_completed: bool,

    pub check_in_by: Option<Uuid>,

    pub check_out_by: Option<Uuid>,
}

/// Partial update for a booking
///
/// Changing `house` re-parents the booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBooking {
    #[validate(length(min = 1, message = "guestFirstName must not be empty"))]
    pub guest_first_name: Option<String>,

    #[validate(length(min = 1, message = "guestLastName must not be empty"))]
    pub guest_last_name: Option<String>,

    pub house: Option<Uuid>,

    pub check_in_date: Option<DateTime<Utc>>,

    pub check_out_date: Option<DateTime<Utc>>,

    pub check_in_completed: Option<bool>,

    pub check_out_completed: Option<bool>,

    pub check_in_by: Option<Uuid>,

    pub check_out_by: Option<Uuid>,
}

impl Booking {
    /// Builds a fresh booking with a generated id
    pub fn new(data: CreateBooking) -> Self {
        let mut booking = Self {
            id: Uuid::new_v4(),
            guest_first_name: data.guest_first_name,
            guest_last_name: data.guest_last_name,
            house: data.house,
            check_in_date: data.check_in_date,
            check_out_date: data.check_out_date,
            check_in_completed: data.check_in_completed,
            check_out_completed: data.check_out_completed,
            check_in_by: data.check_in_by,
            check_out_by: data.check_out_by,
            created_at: Utc::now(),
        };
        booking.normalize();
        booking
    }

    /// Applies a partial update in place
    pub fn apply(&mut self, update: UpdateBooking) {
        if let Some(first) = update.guest_first_name {
            self.guest_first_name = first;
        }
        if let Some(last) = update.guest_last_name {
            self.guest_last_name = last;
        }
        if let Some(house) = update.house {
            self.house = house;
        }
        if let Some(date) = update.check_in_date {
            self.check_in_date = date;
        }
        if let Some(date) = update.check_out_date {
            self.check_out_date = date;
        }
        if let Some(done) = update.check_in_completed {
            self.check_in_completed = done;
        }
        if let Some(done) = update.check_out_completed {
            self.check_out_completed = done;
        }
        if update.check_in_by.is_some() {
            self.check_in_by = update.check_in_by;
        }
        if update.check_out_by.is_some() {
            self.check_out_by = update.check_out_by;
        }
        self.normalize();
    }

    /// True when the stay dates are in order
    pub fn has_valid_stay(&self) -> bool {
        self.check_out_date >= self.check_in_date
    }

    /// Clears the performer of any step that is not completed
    pub fn normalize(&mut self) {
        if !self.check_in_completed {
            self.check_in_by = None;
        }
        if !self.check_out_completed {
            self.check_out_by = None;
        }
    }

    /// Inserts a new booking
    pub async fn create(pool: &PgPool, data: CreateBooking) -> Result<Self, sqlx::Error> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (guest_first_name, guest_last_name, house, check_in_date,
                                  check_out_date, check_in_completed, check_out_completed,
                                  check_in_by, check_out_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, guest_first_name, guest_last_name, house, check_in_date, check_out_date,
                      check_in_completed, check_out_completed, check_in_by, check_out_by, created_at
            "#,
        )
        .bind(data.guest_first_name)
        .bind(data.guest_last_name)
        .bind(data.house)
        .bind(data.check_in_date)
        .bind(data.check_out_date)
        .bind(data.check_in_completed)
        .bind(data.check_out_completed)
        .bind(data.check_in_by.filter(|_| data.check_in_completed))
        .bind(data.check_out_by.filter(|_| data.check_out_completed))
        .fetch_one(pool)
        .await?;

        Ok(booking)
    }

    /// Finds a booking by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, guest_first_name, guest_last_name, house, check_in_date, check_out_date,
                   check_in_completed, check_out_completed, check_in_by, check_out_by, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(booking)
    }

    /// Lists all bookings, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, guest_first_name, guest_last_name, house, check_in_date, check_out_date,
                   check_in_completed, check_out_completed, check_in_by, check_out_by, created_at
            FROM bookings
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(bookings)
    }

    /// Writes every field except `id` and `created_at` back to the row
    pub async fn save(pool: &PgPool, booking: &Booking) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET guest_first_name = $2, guest_last_name = $3, house = $4,
                check_in_date = $5, check_out_date = $6,
                check_in_completed = $7, check_out_completed = $8,
                check_in_by = $9, check_out_by = $10
            WHERE id = $1
            "#,
        )
        .bind(booking.id)
        .bind(&booking.guest_first_name)
        .bind(&booking.guest_last_name)
        .bind(booking.house)
        .bind(booking.check_in_date)
        .bind(booking.check_out_date)
        .bind(booking.check_in_completed)
        .bind(booking.check_out_completed)
        .bind(booking.check_in_by)
        .bind(booking.check_out_by)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a booking by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every booking of a house, returning the deleted rows
    pub async fn delete_by_house(pool: &PgPool, house: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            DELETE FROM bookings
            WHERE house = $1
            RETURNING id, guest_first_name, guest_last_name, house, check_in_date, check_out_date,
                      check_in_completed, check_out_completed, check_in_by, check_out_by, created_at
            "#,
        )
        .bind(house)
        .fetch_all(pool)
        .await?;

        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_data() -> CreateBooking {
        let check_in = Utc::now();
        CreateBooking {
            guest_first_name: "Joan".to_string(),
            guest_last_name: "Doe".to_string(),
            house: Uuid::new_v4(),
            check_in_date: check_in,
            check_out_date: check_in + Duration::days(3),
            check_in_completed: false,
            check_out_completed: false,
            check_in_by: Some(Uuid::new_v4()),
            check_out_by: None,
        }
    }

    #[test]
    fn test_performer_cleared_when_not_completed() {
        let booking = Booking::new(create_data());
        assert!(booking.check_in_by.is_none());
    }

    #[test]
    fn test_apply_check_in() {
        let mut booking = Booking::new(create_data());
        let staff = Uuid::new_v4();

        booking.apply(UpdateBooking {
            check_in_completed: Some(true),
            check_in_by: Some(staff),
            ..Default::default()
        });

        assert!(booking.check_in_completed);
        assert_eq!(booking.check_in_by, Some(staff));

        booking.apply(UpdateBooking {
            check_in_completed: Some(false),
            ..Default::default()
        });
        assert!(booking.check_in_by.is_none());
    }

    #[test]
    fn test_stay_order() {
        let mut data = create_data();
        assert!(Booking::new(data.clone()).has_valid_stay());

        data.check_out_date = data.check_in_date - Duration::days(1);
        assert!(!Booking::new(data).has_valid_stay());
    }
}
