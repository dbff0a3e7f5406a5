use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{UpdateUserRequest, User, UserRole},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    users: Vec<UserDto>,
    total: i64,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            phone: user.phone,
            city: user.city,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let users = state.service_context.user_repo
        .list(params.limit, params.offset)
        .await?;
    let total = state.service_context.user_repo.count().await?;

    let users: Vec<UserDto> = users.into_iter().map(Into::into).collect();

    Ok(Json(ListResponse { users, total }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>> {
    let user = state.service_context.user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>> {
    // Profiles are self-service: nobody edits another user's profile.
    if current.user.id != id {
        return Err(AppError::Forbidden);
    }

    update.validate()?;

    let user = state.service_context.user_repo
        .update(id, update)
        .await?;

    Ok(Json(user.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if current.user.id != id {
        return Err(AppError::Forbidden);
    }

    state.service_context.auth_service
        .invalidate_sessions_for_user(id)
        .await?;
    state.service_context.user_repo
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
