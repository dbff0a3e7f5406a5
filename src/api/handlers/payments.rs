use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreatePaymentRequest, Payment, PaymentFilter, PaymentMethod, PaymentStatus, SortOrder},
    error::{AppError, Result},
    service::PaymentService,
};

use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
    payment_method: Option<PaymentMethod>,
    paid_course_id: Option<Uuid>,
    paid_lesson_id: Option<Uuid>,
    #[serde(default)]
    order: SortOrder,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    payments: Vec<PaymentDto>,
    total: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub provider_price_id: Option<String>,
    pub checkout_session_id: Option<String>,
    pub checkout_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            user_id: payment.user_id,
            paid_course_id: payment.paid_course_id,
            paid_lesson_id: payment.paid_lesson_id,
            amount_cents: payment.amount_cents,
            payment_method: payment.payment_method,
            status: payment.status,
            provider_price_id: payment.provider_price_id,
            checkout_session_id: payment.checkout_session_id,
            checkout_url: payment.checkout_url,
            created_at: payment.created_at.to_rfc3339(),
            updated_at: payment.updated_at.to_rfc3339(),
        }
    }
}

fn payment_service(state: &AppState) -> Result<Arc<PaymentService>> {
    state.payments.clone().ok_or_else(|| {
        AppError::ServiceUnavailable("Payment processing is not configured".to_string())
    })
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let filter = PaymentFilter {
        payment_method: params.payment_method,
        paid_course_id: params.paid_course_id,
        paid_lesson_id: params.paid_lesson_id,
        order: params.order,
    };

    let payments = state.service_context.payment_repo
        .list_for_user(current.user.id, &filter, params.limit, params.offset)
        .await?;
    let total = state.service_context.payment_repo
        .count_for_user(current.user.id, &filter)
        .await?;

    let payments: Vec<PaymentDto> = payments.into_iter().map(Into::into).collect();

    Ok(Json(ListResponse { payments, total }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentDto>)> {
    let service = payment_service(&state)?;

    let payment = service.create_payment(&current.user, request).await?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentDto>> {
    let service = payment_service(&state)?;

    let payment = service.get_payment(&current.user, id).await?;

    Ok(Json(payment.into()))
}
