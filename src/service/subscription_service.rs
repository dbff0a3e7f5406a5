use std::sync::Arc;
use uuid::Uuid;
use crate::{
    domain::{ToggleOutcome, User},
    error::{AppError, Result},
    repository::{CourseRepository, SubscriptionRepository},
};

pub struct SubscriptionService {
    course_repo: Arc<dyn CourseRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(
        course_repo: Arc<dyn CourseRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            course_repo,
            subscription_repo,
        }
    }

    /// Flips the actor's subscription to a course. Moderators curate
    /// material rather than consume it, so they cannot subscribe.
    pub async fn toggle(&self, actor: &User, course_id: Uuid) -> Result<ToggleOutcome> {
        if actor.is_moderator() {
            return Err(AppError::Forbidden);
        }

        self.course_repo.find_by_id(course_id).await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        self.subscription_repo.toggle(actor.id, course_id).await
    }
}
