use std::sync::Arc;
use uuid::Uuid;
use crate::{
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, NotificationQueue},
    repository::{CourseRepository, LessonRepository, SubscriptionRepository},
};

pub struct CourseService {
    course_repo: Arc<dyn CourseRepository>,
    lesson_repo: Arc<dyn LessonRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
    notifications: Arc<dyn NotificationQueue>,
}

impl CourseService {
    pub fn new(
        course_repo: Arc<dyn CourseRepository>,
        lesson_repo: Arc<dyn LessonRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
        notifications: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            course_repo,
            lesson_repo,
            subscription_repo,
            notifications,
        }
    }

    /// Applies the update and queues one notification per distinct
    /// subscriber email. Enqueueing is fire-and-forget: the response does
    /// not wait for delivery.
    pub async fn update_course(&self, id: Uuid, update: UpdateCourseRequest) -> Result<Course> {
        let course = self.course_repo.update(id, update).await?;

        let emails = self.subscriber_emails_or_log(course.id).await;
        for email in emails {
            self.notifications
                .enqueue(Notification::course_updated(&course.title, email));
        }

        Ok(course)
    }

    // A course update should not fail because the subscriber lookup did.
    async fn subscriber_emails_or_log(&self, course_id: Uuid) -> Vec<String> {
        match self.subscription_repo.subscriber_emails(course_id).await {
            Ok(emails) => emails,
            Err(e) => {
                tracing::error!(
                    "Failed to collect subscribers for course {}: {:?}",
                    course_id,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Assembles the detail payload: the course, its lessons, and whether
    /// the viewer is subscribed.
    pub async fn course_detail(&self, id: Uuid, viewer_id: Uuid) -> Result<CourseDetail> {
        let course = self.course_repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let lessons = self.lesson_repo.list_for_course(course.id).await?;
        let lessons_count = self.lesson_repo.count_for_course(course.id).await?;
        let is_subscribed = self.subscription_repo.exists(viewer_id, course.id).await?;

        Ok(CourseDetail {
            course,
            lessons_count,
            lessons,
            is_subscribed,
        })
    }
}
