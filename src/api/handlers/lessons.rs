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
    auth::policy::{self, Action},
    domain::{CreateLessonRequest, Lesson, UpdateLessonRequest},
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
    lessons: Vec<LessonDto>,
    total: i64,
}

#[derive(Debug, Serialize)]
pub struct LessonDto {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_link: String,
    pub owner_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Lesson> for LessonDto {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            description: lesson.description,
            video_link: lesson.video_link,
            owner_id: lesson.owner_id,
            created_at: lesson.created_at.to_rfc3339(),
            updated_at: lesson.updated_at.to_rfc3339(),
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<LessonDto>)> {
    policy::authorize_create(&current.user)?;
    request.validate()?;

    state.service_context.course_repo
        .find_by_id(request.course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let lesson = state.service_context.lesson_repo
        .create(request, current.user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(lesson.into())))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let lessons = state.service_context.lesson_repo
        .list_by_owner(current.user.id, params.limit, params.offset)
        .await?;
    let total = state.service_context.lesson_repo
        .count_by_owner(current.user.id)
        .await?;

    let lessons: Vec<LessonDto> = lessons.into_iter().map(Into::into).collect();

    Ok(Json(ListResponse { lessons, total }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonDto>> {
    let lesson = state.service_context.lesson_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    policy::authorize(&current.user, lesson.owner_id, Action::Retrieve)?;

    Ok(Json(lesson.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateLessonRequest>,
) -> Result<Json<LessonDto>> {
    let lesson = state.service_context.lesson_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    policy::authorize(&current.user, lesson.owner_id, Action::Update)?;
    update.validate()?;

    let lesson = state.service_context.lesson_repo
        .update(id, update)
        .await?;

    Ok(Json(lesson.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let lesson = state.service_context.lesson_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    policy::authorize(&current.user, lesson.owner_id, Action::Destroy)?;

    state.service_context.lesson_repo
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
