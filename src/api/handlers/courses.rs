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
    domain::{Course, CourseDetail, CreateCourseRequest, UpdateCourseRequest},
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
    courses: Vec<CourseDto>,
    total: i64,
}

#[derive(Debug, Serialize)]
pub struct CourseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            owner_id: course.owner_id,
            created_at: course.created_at.to_rfc3339(),
            updated_at: course.updated_at.to_rfc3339(),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let courses = state.service_context.course_repo
        .list_by_owner(current.user.id, params.limit, params.offset)
        .await?;
    let total = state.service_context.course_repo
        .count_by_owner(current.user.id)
        .await?;

    let courses: Vec<CourseDto> = courses.into_iter().map(Into::into).collect();

    Ok(Json(ListResponse { courses, total }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseDto>)> {
    policy::authorize_create(&current.user)?;
    request.validate()?;

    let course = state.service_context.course_repo
        .create(request, current.user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetail>> {
    let course = state.service_context.course_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    policy::authorize(&current.user, course.owner_id, Action::Retrieve)?;

    let detail = state.service_context.course_service
        .course_detail(id, current.user.id)
        .await?;

    Ok(Json(detail))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateCourseRequest>,
) -> Result<Json<CourseDto>> {
    let course = state.service_context.course_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    policy::authorize(&current.user, course.owner_id, Action::Update)?;
    update.validate()?;

    let course = state.service_context.course_service
        .update_course(id, update)
        .await?;

    Ok(Json(course.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let course = state.service_context.course_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    policy::authorize(&current.user, course.owner_id, Action::Destroy)?;

    state.service_context.course_repo
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
