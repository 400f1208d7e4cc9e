/// Integration tests for the Hostkeep API
///
/// Drive the full router over an in-memory store:
/// - Public and guarded routes
/// - Create envelope, bare reads, empty update/delete bodies
/// - Back-reference, counter and cascade maintenance seen through HTTP
/// - Account ownership rules

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::{json, Value};

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

async fn customer(ctx: &TestContext) -> String {
    ctx.create("/customers", json!({ "firstName": "Carla", "lastName": "Moreira" }))
        .await
}

async fn house(ctx: &TestContext, owner: &str, label: &str) -> String {
    ctx.create(
        "/houses",
        json!({
            "label": label,
            "type": "apartment",
            "address": "Rua Augusta 10",
            "city": "Lisboa",
            "owner": owner
        }),
    )
    .await
}

async fn work(ctx: &TestContext) -> String {
    ctx.create(
        "/works",
        json!({ "name": "Cleaning", "frequency": "weekly", "advance": 1 }),
    )
    .await
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_guarded_routes_require_token() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send("GET", "/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = ctx.send("GET", "/customers", None, Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = ctx.authed("GET", "/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_envelope_and_crud_bodies() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .authed(
            "POST",
            "/works",
            Some(json!({ "name": "Garden", "frequency": "monthly", "advance": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added record");
    assert_eq!(body["status"], 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["content"]["name"], "Garden");
    let id = body["content"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .authed("PUT", &format!("/works/{}", id), Some(json!({ "advance": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (_, body) = ctx.authed("GET", &format!("/works/{}", id), None).await;
    assert_eq!(body["advance"], 5);
    assert_eq!(body["name"], "Garden");

    let (status, body) = ctx.authed("DELETE", &format!("/works/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = ctx.authed("GET", &format!("/works/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Cannot find work '{}'", id));
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .authed("POST", "/customers", Some(json!({ "firstName": "", "lastName": "X" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"][0]["field"].is_string());

    let (status, _) = ctx
        .authed("POST", "/customers", Some(json!({ "lastName": "X" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx.authed("GET", "/customers/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_house_task_lifecycle_over_http() {
    let ctx = TestContext::new().await;
    let (_, cleaner) = ctx.register("cleaner", "cleaner@hostkeep.test").await;
    let cleaner_id = cleaner["content"]["id"].as_str().unwrap().to_string();

    let owner = customer(&ctx).await;
    let h1 = house(&ctx, &owner, "H1").await;
    let h2 = house(&ctx, &owner, "H2").await;
    let w = work(&ctx).await;

    let (_, body) = ctx.authed("GET", &format!("/customers/{}", owner), None).await;
    let houses: Vec<String> = body["houses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(houses, vec![h1.clone(), h2.clone()]);

    let task = ctx
        .create(
            "/tasks",
            json!({
                "house": h1,
                "work": w,
                "cost": 40.0,
                "deadline": "2030-01-01T10:00:00Z"
            }),
        )
        .await;
    let (_, body) = ctx.authed("GET", &format!("/houses/{}", h1), None).await;
    assert_eq!(body["tasks"][0]["id"], task.as_str());
    assert_eq!(body["owner"]["id"], owner.as_str());

    let (status, _) = ctx
        .authed(
            "PUT",
            &format!("/tasks/{}", task),
            Some(json!({ "completed": true, "completedBy": cleaner_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = ctx.authed("GET", &format!("/users/{}", cleaner_id), None).await;
    assert_eq!(body["counters"]["tasks"], 1);

    ctx.authed("PUT", &format!("/tasks/{}", task), Some(json!({ "house": h2 })))
        .await;
    let (_, list) = ctx.authed("GET", "/houses", None).await;
    let by_id = |id: &str| {
        list.as_array()
            .unwrap()
            .iter()
            .find(|h| h["id"] == id)
            .cloned()
            .unwrap()
    };
    assert!(ids(&by_id(&h1)["tasks"]).is_empty());
    assert_eq!(ids(&by_id(&h2)["tasks"]), vec![task.clone()]);

    let (status, _) = ctx.authed("DELETE", &format!("/houses/{}", h2), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.authed("GET", &format!("/tasks/{}", task), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = ctx.authed("GET", &format!("/users/{}", cleaner_id), None).await;
    assert_eq!(body["counters"]["tasks"], 0);
}

#[tokio::test]
async fn test_booking_check_in_credits_caller() {
    let ctx = TestContext::new().await;
    let owner = customer(&ctx).await;
    let h = house(&ctx, &owner, "H").await;

    let booking = ctx
        .create(
            "/bookings",
            json!({
                "guestFirstName": "Guest",
                "guestLastName": "One",
                "house": h,
                "checkInDate": "2030-06-01T15:00:00Z",
                "checkOutDate": "2030-06-05T11:00:00Z"
            }),
        )
        .await;

    ctx.authed(
        "PUT",
        &format!("/bookings/{}", booking),
        Some(json!({ "checkInCompleted": true })),
    )
    .await;

    let (_, body) = ctx.authed("GET", "/users/profile", None).await;
    assert_eq!(body["counters"]["checkIns"], 1);

    let (_, body) = ctx.authed("GET", &format!("/bookings/{}", booking), None).await;
    assert_eq!(body["house"]["id"], h.as_str());
    assert_eq!(body["checkInBy"], ctx.user_id.as_str());
}

#[tokio::test]
async fn test_customer_delete_cascades() {
    let ctx = TestContext::new().await;
    let owner = customer(&ctx).await;
    let h = house(&ctx, &owner, "H").await;
    let w = work(&ctx).await;
    ctx.create(
        "/tasks",
        json!({ "house": h, "work": w, "cost": 10.0, "deadline": "2030-01-01T10:00:00Z" }),
    )
    .await;

    let (status, _) = ctx.authed("DELETE", &format!("/customers/{}", owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, houses) = ctx.authed("GET", "/houses", None).await;
    let (_, tasks) = ctx.authed("GET", "/tasks", None).await;
    assert_eq!(houses, json!([]));
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn test_register_is_the_user_create_route() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.register("Nuno", "Nuno@Hostkeep.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added record");
    assert_eq!(body["success"], true);
    assert_eq!(body["content"]["username"], "nuno");
    assert_eq!(body["content"]["email"], "nuno@hostkeep.test");
    assert!(body["content"].get("passwordHash").is_none());

    let (status, _) = ctx.register("other", "NUNO@hostkeep.test").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let id = body["content"]["id"].as_str().unwrap();
    let (status, body) = ctx.authed("GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "nuno");
}

#[tokio::test]
async fn test_login_and_registration_errors() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.register("STAFF", "another@hostkeep.test").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .send(
            "POST",
            "/users/login",
            Some(json!({ "username": "staff", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send(
            "POST",
            "/users/login",
            Some(json!({ "username": "ghost", "password": "whatever" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_act_only_on_themselves() {
    let ctx = TestContext::new().await;
    let (_, other) = ctx.register("other", "other@hostkeep.test").await;
    let other_id = other["content"]["id"].as_str().unwrap().to_string();

    let (status, _) = ctx
        .authed("PUT", &format!("/users/{}", other_id), Some(json!({ "firstName": "X" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.authed("DELETE", &format!("/users/{}", other_id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .authed(
            "PUT",
            &format!("/users/reset-password/{}", ctx.user_id),
            Some(json!({ "password": "new-password", "passwordConfirmation": "new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    ctx.login("staff", "new-password").await;

    let (_, list) = ctx.authed("GET", "/users", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert!(list[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_reconcile_endpoint() {
    let ctx = TestContext::new().await;
    let owner = customer(&ctx).await;
    house(&ctx, &owner, "H").await;

    let (status, body) = ctx.authed("POST", "/maintenance/reconcile", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customersRepaired"], 0);
    assert_eq!(body["housesRepaired"], 0);
    assert_eq!(body["usersRepaired"], 0);
}
