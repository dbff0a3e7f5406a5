use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod course_repository;
pub mod lesson_repository;
pub mod subscription_repository;
pub mod payment_repository;

pub use user_repository::SqliteUserRepository;
pub use course_repository::SqliteCourseRepository;
pub use lesson_repository::SqliteLessonRepository;
pub use subscription_repository::SqliteSubscriptionRepository;
pub use payment_repository::SqlitePaymentRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest, password_hash: &str) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: Uuid, update: UpdateUserRequest) -> Result<User>;
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<User>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: CreateCourseRequest, owner_id: Uuid) -> Result<Course>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>>;
    async fn list_by_owner(&self, owner_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Course>>;
    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64>;
    async fn update(&self, id: Uuid, update: UpdateCourseRequest) -> Result<Course>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn create(&self, lesson: CreateLessonRequest, owner_id: Uuid) -> Result<Lesson>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>>;
    async fn list_by_owner(&self, owner_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Lesson>>;
    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64>;
    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Lesson>>;
    async fn count_for_course(&self, course_id: Uuid) -> Result<i64>;
    async fn update(&self, id: Uuid, update: UpdateLessonRequest) -> Result<Lesson>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Atomically flips the subscription for (user, course): removes it when
    /// present, creates it when absent.
    async fn toggle(&self, user_id: Uuid, course_id: Uuid) -> Result<ToggleOutcome>;
    async fn exists(&self, user_id: Uuid, course_id: Uuid) -> Result<bool>;
    /// Distinct emails of everyone subscribed to the course.
    async fn subscriber_emails(&self, course_id: Uuid) -> Result<Vec<String>>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<Payment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Payment>>;
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &PaymentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>>;
    async fn count_for_user(&self, user_id: Uuid, filter: &PaymentFilter) -> Result<i64>;
    async fn update(&self, id: Uuid, payment: Payment) -> Result<Payment>;
    async fn update_status(&self, id: Uuid, status: PaymentStatus) -> Result<Payment>;
}
