pub mod course_service;
pub mod subscription_service;
pub mod payment_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::auth::AuthService;
use crate::notifications::NotificationQueue;
use crate::repository::*;
use course_service::CourseService;
use subscription_service::SubscriptionService;

pub use payment_service::PaymentService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub course_repo: Arc<dyn CourseRepository>,
    pub lesson_repo: Arc<dyn LessonRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub auth_service: Arc<AuthService>,
    pub notifications: Arc<dyn NotificationQueue>,
    pub course_service: Arc<CourseService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        course_repo: Arc<dyn CourseRepository>,
        lesson_repo: Arc<dyn LessonRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        auth_service: Arc<AuthService>,
        notifications: Arc<dyn NotificationQueue>,
        db_pool: SqlitePool,
    ) -> Self {
        let course_service = Arc::new(CourseService::new(
            course_repo.clone(),
            lesson_repo.clone(),
            subscription_repo.clone(),
            notifications.clone(),
        ));
        let subscription_service = Arc::new(SubscriptionService::new(
            course_repo.clone(),
            subscription_repo.clone(),
        ));

        Self {
            user_repo,
            course_repo,
            lesson_repo,
            subscription_repo,
            payment_repo,
            auth_service,
            notifications,
            course_service,
            subscription_service,
            db_pool,
        }
    }
}
