#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, Method, StatusCode};
use actix_web::{test, web, App};
use boardforge::Config;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};

pub const JWT_SECRET: &str = "integration-test-secret";

static COUNTER: AtomicU32 = AtomicU32::new(0);

pub struct TestUser {
    pub id: i32,
    pub email: String,
    pub token: String,
}

pub fn test_config() -> Config {
    let database_url = std::env::var("DATABASE_URL").unwrap_or_default();
    Config::for_tests(&database_url, JWT_SECRET)
}

/// Connects to the database named by `DATABASE_URL` and applies migrations.
/// Returns `None`, so the calling test can bail out, when no database is configured.
pub async fn test_pool() -> Option<PgPool> {
    dotenv::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    }
    Some(
        boardforge::db::connect(&test_config())
            .await
            .expect("Failed to connect to test DB"),
    )
}

pub async fn init_app(
    pool: &PgPool,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_config()))
            .configure(boardforge::configure),
    )
    .await
}

/// An email address no other test run will use.
pub fn unique_email(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}-{}@example.com", prefix, nanos, n)
}

/// Sends a request and returns the status with the parsed body
/// (`Value::Null` for an empty body).
pub async fn call(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }

    let resp = match test::try_call_service(app, req.to_request()).await {
        Ok(resp) => resp,
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            return (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null));
        }
    };

    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    prefix: &str,
    fullname: &str,
) -> TestUser {
    let email = unique_email(prefix);
    let (status, body) = call(
        app,
        Method::POST,
        "/api/registration/",
        None,
        Some(json!({
            "fullname": fullname,
            "email": email,
            "password": "Password123!",
            "repeated_password": "Password123!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed: {}", body);

    TestUser {
        id: body["user_id"].as_i64().expect("user_id") as i32,
        email,
        token: body["token"].as_str().expect("token").to_string(),
    }
}

pub async fn create_board(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    owner: &TestUser,
    title: &str,
    members: &[i32],
) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/boards/",
        Some(owner.token.as_str()),
        Some(json!({ "title": title, "members": members })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Board creation failed: {}", body);
    body["id"].as_i64().expect("board id")
}

pub async fn create_task(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    user: &TestUser,
    payload: Value,
) -> Value {
    let (status, body) = call(app, Method::POST, "/api/tasks/", Some(user.token.as_str()), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "Task creation failed: {}", body);
    body
}

pub async fn cleanup_users(pool: &PgPool, users: &[&TestUser]) {
    for user in users {
        let _ = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(&user.email)
            .execute(pool)
            .await;
    }
}
