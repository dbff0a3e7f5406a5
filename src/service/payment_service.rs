use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{CreatePaymentRequest, Payment, PaymentTarget, User},
    error::{AppError, Result},
    payments::PaymentGateway,
    repository::{CourseRepository, LessonRepository, PaymentRepository},
};

pub struct PaymentService {
    payment_repo: Arc<dyn PaymentRepository>,
    course_repo: Arc<dyn CourseRepository>,
    lesson_repo: Arc<dyn LessonRepository>,
    gateway: Arc<dyn PaymentGateway>,
    provider_timeout: Duration,
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        course_repo: Arc<dyn CourseRepository>,
        lesson_repo: Arc<dyn LessonRepository>,
        gateway: Arc<dyn PaymentGateway>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            payment_repo,
            course_repo,
            lesson_repo,
            gateway,
            provider_timeout,
        }
    }

    // Every provider round-trip runs under the configured deadline so a
    // stalled provider fails the request instead of hanging it.
    async fn with_timeout<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.provider_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::ProviderTimeout),
        }
    }

    async fn target_title(&self, target: PaymentTarget) -> Result<String> {
        match target {
            PaymentTarget::Course(id) => self.course_repo.find_by_id(id).await?
                .map(|course| course.title)
                .ok_or_else(|| AppError::NotFound("Course not found".to_string())),
            PaymentTarget::Lesson(id) => self.lesson_repo.find_by_id(id).await?
                .map(|lesson| lesson.title)
                .ok_or_else(|| AppError::NotFound("Lesson not found".to_string())),
        }
    }

    /// Creates the local record first, then asks the provider for a product,
    /// price, and checkout session, and stores the resulting identifiers.
    /// A provider failure leaves the record pending with empty provider
    /// fields; the caller may retry by creating a new payment.
    pub async fn create_payment(
        &self,
        user: &User,
        request: CreatePaymentRequest,
    ) -> Result<Payment> {
        request.validate()?;

        let target = PaymentTarget::from_ids(request.paid_course_id, request.paid_lesson_id)
            .ok_or_else(|| {
                AppError::Validation(
                    "exactly one of paid_course_id or paid_lesson_id must be set".to_string(),
                )
            })?;

        let title = self.target_title(target).await?;

        let mut payment = self.payment_repo
            .create(Payment::new(
                user.id,
                target,
                request.amount_cents,
                request.payment_method,
            ))
            .await?;

        let details = match self
            .with_timeout(self.gateway.create_checkout(&title, request.amount_cents))
            .await
        {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    "Checkout creation failed for payment {}: {:?}",
                    payment.id,
                    e
                );
                return Err(e);
            }
        };

        payment.provider_price_id = Some(details.price_id);
        payment.checkout_session_id = Some(details.session_id);
        payment.checkout_url = Some(details.checkout_url);

        self.payment_repo.update(payment.id, payment).await
    }

    /// Fetches a payment scoped to the requesting user and refreshes its
    /// status from the provider. Every read re-queries and persists, even
    /// when the status has not changed.
    pub async fn get_payment(&self, user: &User, id: Uuid) -> Result<Payment> {
        let payment = self.payment_repo.find_for_user(user.id, id).await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        let Some(session_id) = payment.checkout_session_id.clone() else {
            // Provider fields were never populated; nothing to refresh.
            return Ok(payment);
        };

        let status = self.with_timeout(self.gateway.session_status(&session_id)).await?;

        self.payment_repo.update_status(payment.id, status).await
    }
}
