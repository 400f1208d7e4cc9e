/// API route handlers
///
/// One module per resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login and account endpoints
/// - `customers`, `houses`, `bookings`, `tasks`, `works`: Entity CRUD
/// - `maintenance`: Back-reference and counter reconciliation
///
/// Creates answer with the [`Created`] envelope, reads with the bare record
/// or array, updates and deletes with an empty `200`.

pub mod bookings;
pub mod customers;
pub mod health;
pub mod houses;
pub mod maintenance;
pub mod tasks;
pub mod users;
pub mod works;

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};
use axum::Json;
use hostkeep_shared::integrity::{ConsistencyIssue, Outcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JSON request body; malformed input answers 400 in the usual error shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// Record id from the `/:id` path segment
#[derive(Debug, Clone, Copy, Deserialize, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct RecordId(pub Uuid);

/// Create response envelope
///
/// ```json
/// { "message": "Added record", "content": { … }, "status": 200, "success": true }
/// ```
#[derive(Debug, Serialize)]
pub struct Created<T> {
    pub message: &'static str,

    pub content: T,

    pub status: u16,

    pub success: bool,

    /// Back-reference or counter updates that did not apply
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ConsistencyIssue>,
}

pub fn created<T: Serialize>(content: T) -> Json<Created<T>> {
    Json(Created {
        message: "Added record",
        content,
        status: 200,
        success: true,
        issues: Vec::new(),
    })
}

pub fn created_with_report<T: Serialize>(outcome: Outcome<T>) -> Json<Created<T>> {
    Json(Created {
        message: "Added record",
        content: outcome.record,
        status: 200,
        success: true,
        issues: outcome.report.issues,
    })
}
