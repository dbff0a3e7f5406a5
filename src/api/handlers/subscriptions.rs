use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::ToggleSubscriptionRequest,
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub message: String,
    pub subscribed: bool,
}

pub async fn toggle(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<ToggleSubscriptionRequest>,
) -> Result<Json<ToggleResponse>> {
    let outcome = state.service_context.subscription_service
        .toggle(&current.user, request.course_id)
        .await?;

    Ok(Json(ToggleResponse {
        message: outcome.message().to_string(),
        subscribed: outcome.subscribed(),
    }))
}
