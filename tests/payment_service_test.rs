mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lyceum::{
    domain::{CreatePaymentRequest, PaymentFilter, PaymentMethod, PaymentStatus},
    error::{AppError, Result},
    payments::{fake::FakeCheckoutGateway, CheckoutDetails, PaymentGateway},
    service::{PaymentService, ServiceContext},
};
use uuid::Uuid;

fn service_with(context: &ServiceContext, gateway: Arc<dyn PaymentGateway>) -> PaymentService {
    PaymentService::new(
        context.payment_repo.clone(),
        context.course_repo.clone(),
        context.lesson_repo.clone(),
        gateway,
        Duration::from_secs(1),
    )
}

fn course_payment(course_id: Uuid, amount_cents: i64) -> CreatePaymentRequest {
    CreatePaymentRequest {
        paid_course_id: Some(course_id),
        paid_lesson_id: None,
        amount_cents,
        payment_method: PaymentMethod::Card,
    }
}

#[tokio::test]
async fn test_checkout_populates_provider_references() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let course = common::create_course(&context, &owner, "Linear Algebra").await?;

    let service = service_with(&context, Arc::new(FakeCheckoutGateway::new()));

    let payment = service.create_payment(&buyer, course_payment(course.id, 4900)).await?;

    assert_eq!(payment.user_id, buyer.id);
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.provider_price_id.is_some());
    assert!(payment.checkout_session_id.is_some());
    assert!(payment.checkout_url.is_some());

    // The stored row carries the same provider references
    let stored = context.payment_repo.find_by_id(payment.id).await?.unwrap();
    assert_eq!(stored.checkout_session_id, payment.checkout_session_id);
    assert_eq!(stored.checkout_url, payment.checkout_url);

    Ok(())
}

#[tokio::test]
async fn test_provider_failure_keeps_pending_record() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let course = common::create_course(&context, &owner, "Linear Algebra").await?;

    let service = service_with(&context, Arc::new(FakeCheckoutGateway::failing()));

    let err = service.create_payment(&buyer, course_payment(course.id, 4900)).await.unwrap_err();
    assert!(matches!(err, AppError::Provider(_)));

    // The local record survives, pending and without provider references
    let payments = context.payment_repo
        .list_for_user(buyer.id, &PaymentFilter::default(), 10, 0)
        .await?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Pending);
    assert!(payments[0].checkout_session_id.is_none());
    assert!(payments[0].checkout_url.is_none());

    Ok(())
}

#[tokio::test]
async fn test_get_payment_refreshes_status_from_provider() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let course = common::create_course(&context, &owner, "Linear Algebra").await?;

    let gateway = Arc::new(FakeCheckoutGateway::new());
    let service = service_with(&context, gateway.clone());

    let payment = service.create_payment(&buyer, course_payment(course.id, 4900)).await?;

    // Provider still reports unpaid
    let fetched = service.get_payment(&buyer, payment.id).await?;
    assert_eq!(fetched.status, PaymentStatus::Unpaid);

    // Once the provider settles, the next read persists the new status
    gateway.set_status(PaymentStatus::Paid);
    let fetched = service.get_payment(&buyer, payment.id).await?;
    assert_eq!(fetched.status, PaymentStatus::Paid);

    let stored = context.payment_repo.find_by_id(payment.id).await?.unwrap();
    assert_eq!(stored.status, PaymentStatus::Paid);

    Ok(())
}

#[tokio::test]
async fn test_payment_is_scoped_to_its_owner() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let other = common::create_user(&context, "other@example.com", "Other").await?;
    let course = common::create_course(&context, &owner, "Linear Algebra").await?;

    let service = service_with(&context, Arc::new(FakeCheckoutGateway::new()));
    let payment = service.create_payment(&buyer, course_payment(course.id, 4900)).await?;

    let err = service.get_payment(&other, payment.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_exactly_one_target_is_required() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let service = service_with(&context, Arc::new(FakeCheckoutGateway::new()));

    // Neither target
    let err = service.create_payment(&buyer, CreatePaymentRequest {
        paid_course_id: None,
        paid_lesson_id: None,
        amount_cents: 4900,
        payment_method: PaymentMethod::Card,
    }).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Both targets
    let err = service.create_payment(&buyer, CreatePaymentRequest {
        paid_course_id: Some(Uuid::new_v4()),
        paid_lesson_id: Some(Uuid::new_v4()),
        amount_cents: 4900,
        payment_method: PaymentMethod::Card,
    }).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // No record was written either way
    let payments = context.payment_repo
        .list_for_user(buyer.id, &PaymentFilter::default(), 10, 0)
        .await?;
    assert!(payments.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_payment_for_missing_material_is_not_found() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let service = service_with(&context, Arc::new(FakeCheckoutGateway::new()));

    let err = service.create_payment(&buyer, course_payment(Uuid::new_v4(), 4900)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

struct TardyGateway;

#[async_trait]
impl PaymentGateway for TardyGateway {
    async fn create_checkout(&self, _product_name: &str, _amount_cents: i64) -> Result<CheckoutDetails> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        unreachable!("the deadline should fire first")
    }

    async fn session_status(&self, _session_id: &str) -> Result<PaymentStatus> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        unreachable!("the deadline should fire first")
    }
}

#[tokio::test]
async fn test_slow_provider_times_out() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (context, _) = common::build_context(pool);

    let owner = common::create_user(&context, "owner@example.com", "Owner").await?;
    let buyer = common::create_user(&context, "buyer@example.com", "Buyer").await?;
    let course = common::create_course(&context, &owner, "Linear Algebra").await?;

    let service = PaymentService::new(
        context.payment_repo.clone(),
        context.course_repo.clone(),
        context.lesson_repo.clone(),
        Arc::new(TardyGateway),
        Duration::from_millis(20),
    );

    let err = service.create_payment(&buyer, course_payment(course.id, 4900)).await.unwrap_err();
    assert!(matches!(err, AppError::ProviderTimeout));

    // The local record still exists, pending, so the attempt is auditable
    let payments = context.payment_repo
        .list_for_user(buyer.id, &PaymentFilter::default(), 10, 0)
        .await?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Pending);

    Ok(())
}
