#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::util::ServiceExt;

use lyceum::{
    api,
    auth::AuthService,
    config::Settings,
    domain::{CreateCourseRequest, CreateUserRequest, Course, User},
    notifications::recording::RecordingQueue,
    payments::fake::FakeCheckoutGateway,
    repository::{
        SqliteCourseRepository, SqliteLessonRepository, SqlitePaymentRepository,
        SqliteSubscriptionRepository, SqliteUserRepository,
    },
    service::{PaymentService, ServiceContext},
};

/// In-memory database for one test. A single connection keeps every query
/// on the same memory-backed store.
pub async fn setup_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub fn build_context(pool: SqlitePool) -> (Arc<ServiceContext>, Arc<RecordingQueue>) {
    let auth_service = Arc::new(AuthService::new(pool.clone(), "test-secret".to_string()));
    let notifications = Arc::new(RecordingQueue::new());

    let context = Arc::new(ServiceContext::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteCourseRepository::new(pool.clone())),
        Arc::new(SqliteLessonRepository::new(pool.clone())),
        Arc::new(SqliteSubscriptionRepository::new(pool.clone())),
        Arc::new(SqlitePaymentRepository::new(pool.clone())),
        auth_service,
        notifications.clone(),
        pool,
    ));

    (context, notifications)
}

fn payment_service(
    context: &ServiceContext,
    gateway: Arc<FakeCheckoutGateway>,
) -> Arc<PaymentService> {
    Arc::new(PaymentService::new(
        context.payment_repo.clone(),
        context.course_repo.clone(),
        context.lesson_repo.clone(),
        gateway,
        Duration::from_secs(1),
    ))
}

/// Full application wired against an in-memory database and a canned
/// payment gateway.
pub async fn test_app() -> anyhow::Result<(Router, Arc<ServiceContext>)> {
    let pool = setup_pool().await?;
    let (context, _) = build_context(pool);
    let payments = Some(payment_service(&context, Arc::new(FakeCheckoutGateway::new())));
    let app = api::create_app(context.clone(), payments, Arc::new(Settings::default()));
    Ok((app, context))
}

/// Application with no payment provider configured.
pub async fn test_app_without_payments() -> anyhow::Result<(Router, Arc<ServiceContext>)> {
    let pool = setup_pool().await?;
    let (context, _) = build_context(pool);
    let app = api::create_app(context.clone(), None, Arc::new(Settings::default()));
    Ok((app, context))
}

pub async fn create_user(context: &ServiceContext, email: &str, name: &str) -> anyhow::Result<User> {
    let hash = AuthService::hash_password("password123").await?;
    let user = context.user_repo.create(CreateUserRequest {
        email: email.to_string(),
        password: "password123".to_string(),
        full_name: name.to_string(),
    }, &hash).await?;
    Ok(user)
}

pub async fn create_course(context: &ServiceContext, owner: &User, title: &str) -> anyhow::Result<Course> {
    let course = context.course_repo.create(CreateCourseRequest {
        title: title.to_string(),
        description: None,
    }, owner.id).await?;
    Ok(course)
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    builder.body(body).expect("request construction failed")
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("request failed")
}

pub async fn body_json(response: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Registers a fresh account over HTTP and logs in, returning the session
/// cookie to attach to subsequent requests.
pub async fn register_and_login(app: &Router, email: &str, name: &str) -> anyhow::Result<String> {
    let response = send(app, json_request(
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "password123",
            "full_name": name,
        })),
    )).await;
    anyhow::ensure!(response.status() == 201, "register failed: {}", response.status());

    login(app, email).await
}

pub async fn login(app: &Router, email: &str) -> anyhow::Result<String> {
    let response = send(app, json_request(
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "password123",
        })),
    )).await;
    anyhow::ensure!(response.status() == 200, "login failed: {}", response.status());

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .ok_or_else(|| anyhow::anyhow!("login response carried no session cookie"))?
        .to_str()?;

    // Keep just the name=value pair
    let cookie = set_cookie
        .split(';')
        .next()
        .unwrap_or(set_cookie)
        .to_string();

    Ok(cookie)
}
