use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_link: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLessonRequest {
    pub course_id: Uuid,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = validate_video_link))]
    pub video_link: String,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = validate_video_link))]
    pub video_link: Option<String>,
}

// Accepts the common YouTube URL shapes: watch?v=, embed/, live/, v/ and the
// youtu.be short form, with optional protocol and www/m subdomain.
static YOUTUBE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:https?:)?//)?((?:www|m)\.)?(?:youtube(?:-nocookie)?\.com|youtu\.be)(/(?:[\w\-]+\?v=|embed/|live/|v/)?)([\w\-]+)(\S+)?$",
    )
    .expect("video link pattern compiles")
});

pub fn validate_video_link(link: &str) -> Result<(), ValidationError> {
    if YOUTUBE_LINK.is_match(link) {
        return Ok(());
    }
    let mut err = ValidationError::new("video_link");
    err.message = Some("only links to materials hosted on YouTube are allowed".into());
    Err(err)
}
